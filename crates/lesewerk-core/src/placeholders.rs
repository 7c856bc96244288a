// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable placeholder content for every failure class.
//
// The engine never surfaces an error: each failure becomes a normal
// `ParsedDocument` whose content is a short, specific explanation in plain
// English, never a stack trace or raw error text.

use crate::error::LesewerkError;
use crate::types::{DocumentKind, DocumentMetadata, ParsedDocument};

/// Placeholder for slide decks, which the engine does not parse yet.
pub fn slide_deck(filename: &str) -> ParsedDocument {
    let metadata = DocumentMetadata {
        title: Some(filename.to_string()),
        slides: Some(1),
        ..DocumentMetadata::default()
    };
    ParsedDocument::text(
        DocumentKind::SlideDeck,
        "Slide presentations are not yet supported for preview. \
         Please convert the presentation to PDF and upload it again.",
        Some(metadata),
    )
}

/// Placeholder for e-books, which the engine does not parse yet.
pub fn ebook(filename: &str) -> ParsedDocument {
    ParsedDocument::text(
        DocumentKind::Ebook,
        "E-book formats are not yet supported for preview. \
         Please convert the book to PDF or plain text and upload it again.",
        Some(DocumentMetadata::titled(filename)),
    )
}

/// Placeholder when a word-processor file could not be read.
pub fn word_processor(filename: &str) -> ParsedDocument {
    ParsedDocument::text(
        DocumentKind::WordProcessor,
        "The text of this document could not be read. \
         Please save it as plain text or PDF and upload it again.",
        Some(DocumentMetadata::titled(filename)),
    )
}

/// Placeholder for a file whose extension no adapter recognizes and whose
/// bytes do not decode as text.
pub fn unsupported(filename: &str) -> ParsedDocument {
    ParsedDocument::text(
        DocumentKind::PlainText,
        "This file format is not supported. \
         Supported formats are PDF, plain text, Markdown, HTML, and DOCX.",
        Some(DocumentMetadata::titled(filename)),
    )
}

/// Map an internal extraction error to a placeholder document of the
/// requested kind. The copy is specific to the failure class but never
/// exposes internals.
pub fn for_error(err: &LesewerkError, kind: DocumentKind, filename: &str) -> ParsedDocument {
    let text = match err {
        LesewerkError::UnsupportedFormat(_) => {
            return unsupported(filename);
        }
        LesewerkError::CorruptDocument(_) => {
            "This document appears to be corrupt or encrypted, and its \
             content could not be extracted. If the file opens normally on \
             your device, try re-exporting it and uploading the new copy."
        }
        LesewerkError::NoExtractableText => {
            "No readable text was found in this document. It may be a \
             scanned copy; try uploading a version with selectable text."
        }
        LesewerkError::ConversionFailure(_) => {
            "This document could not be converted for preview. \
             The file is stored and can still be downloaded."
        }
        LesewerkError::Adapter(_) | LesewerkError::Io(_) | LesewerkError::Serialization(_) => {
            "Something went wrong while reading this document. \
             The file is stored and can still be downloaded."
        }
    };
    ParsedDocument::text(
        kind,
        text,
        Some(DocumentMetadata::titled(format!(
            "Preview unavailable: {filename}"
        ))),
    )
}
