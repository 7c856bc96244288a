// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lesewerk-extract — Content extraction for the Lesewerk document engine.
//
// Provides the decoded-surface scorer, the ordered PDF extraction strategy
// chain, text cleaning, the readability classifier, the rasterization
// fallback, plain-text and word-processor adapters, and the parser facade
// that ties them together.

pub mod adapter;
pub mod clean;
pub mod engine;
pub mod raster;
pub mod readability;
pub mod strategy;
pub mod surface;

// Re-export the primary entry points so callers can use `lesewerk_extract::ExtractionEngine` etc.
pub use engine::{ExtractionEngine, parse_document};
pub use raster::{PageRasterizer, PdfRasterizer, RasterBatch};
pub use surface::TextSurface;
