// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Lesewerk extraction engine.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

/// Which adapter family handled the input document.
///
/// This reflects the *input format*, not necessarily the shape of the
/// extracted content; a `Pdf` result may carry rendered page images when
/// no text could be recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    PlainText,
    Html,
    /// Structured binary container (PDF).
    Pdf,
    /// Flow-text word-processor container (DOCX, ODT, legacy DOC).
    WordProcessor,
    SlideDeck,
    Ebook,
}

impl DocumentKind {
    /// Infer the adapter family from a file extension.
    ///
    /// Returns `None` for extensions the engine has no adapter for; the
    /// facade then falls back to a plain-text attempt.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" | "text" | "md" | "markdown" | "rtf" | "csv" | "log" => Some(Self::PlainText),
            "html" | "htm" | "xhtml" => Some(Self::Html),
            "docx" | "doc" | "odt" => Some(Self::WordProcessor),
            "pptx" | "ppt" | "odp" => Some(Self::SlideDeck),
            "epub" | "mobi" | "azw" | "azw3" => Some(Self::Ebook),
            _ => None,
        }
    }

    /// Extract the extension from a filename and infer the kind.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = filename.rsplit('.').next()?;
        // A name without any dot yields itself, which is not an extension.
        if ext.len() == filename.len() {
            return None;
        }
        Self::from_extension(ext)
    }
}

/// Page count attached to document metadata.
///
/// The text-extraction path counts structural page markers, which is a
/// best-effort estimate. The rasterization path walks the real page tree
/// and is authoritative. Callers that display "N pages" should say so when
/// the value is only estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageCount {
    Estimated(u32),
    Exact(u32),
}

impl PageCount {
    pub fn get(&self) -> u32 {
        match self {
            Self::Estimated(n) | Self::Exact(n) => *n,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }
}

/// Best-effort document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub pages: Option<PageCount>,
    pub slides: Option<u32>,
}

impl DocumentMetadata {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// One rendered page image produced by the rasterization fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPage {
    /// Zero-based page index.
    pub index: u32,
    /// Encoded image bytes.
    pub data: Vec<u8>,
    /// MIME type of `data` (image/png or image/jpeg).
    pub mime: String,
}

impl RenderedPage {
    /// Inline the image as a `data:` URI for embedding in an HTML fragment.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, BASE64.encode(&self.data))
    }
}

/// The extracted body of a document.
///
/// A tagged variant instead of an opaque string: callers branch on the
/// variant to decide how to render, rather than sniffing the content for
/// markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractedContent {
    /// Normalized plain text (or a human-readable placeholder).
    PlainText { text: String },
    /// Page images rendered because no readable text was recoverable.
    RenderedPages {
        pages: Vec<RenderedPage>,
        page_count: u32,
    },
}

impl ExtractedContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::PlainText { text: text.into() }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::RenderedPages { .. })
    }
}

/// The sole output entity of the extraction engine.
///
/// Constructed once per `parse_document` call and immutable afterwards.
/// Invariants: `content()` is never empty, `kind` always reflects the
/// adapter that handled the input, and construction never fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub kind: DocumentKind,
    pub body: ExtractedContent,
    pub metadata: Option<DocumentMetadata>,
}

impl ParsedDocument {
    /// A plain-text result.
    pub fn text(
        kind: DocumentKind,
        text: impl Into<String>,
        metadata: Option<DocumentMetadata>,
    ) -> Self {
        Self {
            kind,
            body: ExtractedContent::PlainText { text: text.into() },
            metadata,
        }
    }

    /// A rendered-pages result from the rasterization fallback.
    pub fn rendered(
        kind: DocumentKind,
        pages: Vec<RenderedPage>,
        page_count: u32,
        metadata: Option<DocumentMetadata>,
    ) -> Self {
        Self {
            kind,
            body: ExtractedContent::RenderedPages { pages, page_count },
            metadata,
        }
    }

    /// Backward-compatible string envelope.
    ///
    /// Plain text passes through; rendered pages become a minimal HTML
    /// fragment with inlined images and "Page N of M" captions.
    pub fn content(&self) -> String {
        match &self.body {
            ExtractedContent::PlainText { text } => text.clone(),
            ExtractedContent::RenderedPages { pages, page_count } => {
                let mut out = String::from(
                    "<div class=\"lesewerk-rendered\">\
                     <p>No machine-readable text was found in this document; \
                     its pages are shown as images instead.</p>",
                );
                for page in pages {
                    out.push_str(&format!(
                        "<figure><img src=\"{}\" alt=\"Page {}\"/>\
                         <figcaption>Page {} of {}</figcaption></figure>",
                        page.data_uri(),
                        page.index + 1,
                        page.index + 1,
                        page_count,
                    ));
                }
                out.push_str("</div>");
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_extension_is_case_insensitive() {
        assert_eq!(DocumentKind::from_extension("PDF"), Some(DocumentKind::Pdf));
        assert_eq!(
            DocumentKind::from_extension("Docx"),
            Some(DocumentKind::WordProcessor)
        );
        assert_eq!(DocumentKind::from_extension("xyz"), None);
    }

    #[test]
    fn kind_from_filename_requires_an_extension() {
        assert_eq!(
            DocumentKind::from_filename("report.final.pdf"),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(DocumentKind::from_filename("README"), None);
    }

    #[test]
    fn rendered_content_contains_captions_and_data_uris() {
        let doc = ParsedDocument::rendered(
            DocumentKind::Pdf,
            vec![RenderedPage {
                index: 0,
                data: vec![1, 2, 3],
                mime: "image/png".into(),
            }],
            3,
            None,
        );
        let content = doc.content();
        assert!(content.contains("Page 1 of 3"));
        assert!(content.contains("data:image/png;base64,"));
        assert!(!content.is_empty());
    }

    #[test]
    fn page_count_distinguishes_estimates() {
        assert!(!PageCount::Estimated(4).is_exact());
        assert!(PageCount::Exact(4).is_exact());
        assert_eq!(PageCount::Estimated(4).get(), 4);
    }
}
