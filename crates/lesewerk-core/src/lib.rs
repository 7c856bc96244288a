// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lesewerk — Core types, errors, and heuristic configuration shared across
// the extraction crates.

pub mod config;
pub mod error;
pub mod placeholders;
pub mod types;

pub use config::HeuristicConfig;
pub use error::LesewerkError;
pub use types::*;
