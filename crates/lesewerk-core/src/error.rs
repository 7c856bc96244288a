// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Lesewerk.
//
// Every variant here is recovered locally: nothing crosses the engine
// boundary as an error. The extraction facade converts each failure class
// into a placeholder `ParsedDocument` (see `placeholders`).

use thiserror::Error;

/// Top-level error type for all Lesewerk operations.
#[derive(Debug, Error)]
pub enum LesewerkError {
    // -- Dispatch errors --
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    // -- Extraction errors --
    #[error("document is corrupt or encrypted: {0}")]
    CorruptDocument(String),

    #[error("no extractable text found")]
    NoExtractableText,

    #[error("page conversion failed: {0}")]
    ConversionFailure(String),

    #[error("adapter failed: {0}")]
    Adapter(String),

    // -- Infrastructure --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LesewerkError>;
