// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Parser facade — dispatches on the filename extension and guarantees the
// never-fails contract.
//
// Every adapter call is wrapped here: whatever goes wrong inside, the
// caller receives a fully-populated `ParsedDocument` whose content is a
// short human-readable explanation. PDF inputs run the full pipeline:
// surface selection, the strategy chain, cleaning, the readability
// classifier, and the rasterization fallback.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, instrument, warn};

use lesewerk_core::error::LesewerkError;
use lesewerk_core::types::{DocumentKind, DocumentMetadata, PageCount, ParsedDocument};
use lesewerk_core::{HeuristicConfig, placeholders};

use crate::adapter;
use crate::clean::{clean_document, clean_fragment};
use crate::raster::{PageRasterizer, PdfRasterizer};
use crate::readability::is_readable;
use crate::strategy::{ExtractionStrategy, ResidualLiteralScan, run_chain};
use crate::surface::TextSurface;

static INFO_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/Title\s*\(((?:\\.|[^\\()])+)\)").unwrap());
static INFO_AUTHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/Author\s*\(((?:\\.|[^\\()])+)\)").unwrap());
/// Page-object markers; `[^s]` keeps `/Type /Pages` tree nodes out.
static PAGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/Type\s*/Page([^s]|$)").unwrap());

/// The extraction engine: heuristic configuration plus a pluggable page
/// rasterizer.
///
/// One engine can serve many concurrent `parse_document` calls; it holds
/// no per-document state.
pub struct ExtractionEngine {
    config: HeuristicConfig,
    rasterizer: Box<dyn PageRasterizer>,
}

impl Default for ExtractionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionEngine {
    /// Engine with the default heuristics and the built-in lopdf
    /// rasterizer.
    pub fn new() -> Self {
        Self::with_config(HeuristicConfig::default())
    }

    /// Engine with tuned heuristics.
    pub fn with_config(config: HeuristicConfig) -> Self {
        Self {
            config,
            rasterizer: Box::new(PdfRasterizer),
        }
    }

    /// Swap in a different rasterizer (a full page renderer, or a stub in
    /// tests).
    pub fn with_rasterizer(mut self, rasterizer: Box<dyn PageRasterizer>) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    /// Parse an uploaded document. Never fails: any input, including
    /// empty, corrupt, encrypted, or mislabeled buffers, yields a
    /// `ParsedDocument` with non-empty content.
    #[instrument(skip_all, fields(filename = %filename, len = data.len()))]
    pub async fn parse_document(&self, data: &[u8], filename: &str) -> ParsedDocument {
        match DocumentKind::from_filename(filename) {
            Some(DocumentKind::Pdf) => self.parse_pdf(data, filename).await,
            Some(kind @ (DocumentKind::PlainText | DocumentKind::Html)) => {
                self.parse_text(data, filename, kind)
            }
            Some(DocumentKind::WordProcessor) => self.parse_word_processor(data, filename),
            Some(DocumentKind::SlideDeck) => placeholders::slide_deck(filename),
            Some(DocumentKind::Ebook) => placeholders::ebook(filename),
            None => self.parse_unknown(data, filename),
        }
    }

    // -- Per-format paths -----------------------------------------------------

    async fn parse_pdf(&self, data: &[u8], filename: &str) -> ParsedDocument {
        let surface = TextSurface::decode_best(data, &self.config);
        let accumulated = run_chain(&surface, &self.config);
        let text = clean_document(&accumulated);

        if text.len() >= self.config.min_text_len && is_readable(&text, &self.config) {
            debug!(chars = text.len(), "readable text extracted");
            let metadata = pdf_metadata(&surface, &self.config);
            return ParsedDocument::text(DocumentKind::Pdf, text, Some(metadata));
        }

        info!(
            extracted_len = text.len(),
            "no readable text recovered; rasterizing pages"
        );
        match self.rasterizer.rasterize(data, &self.config.raster).await {
            Ok(batch) => {
                let mut metadata = pdf_metadata(&surface, &self.config);
                metadata.pages = Some(PageCount::Exact(batch.page_count));
                ParsedDocument::rendered(
                    DocumentKind::Pdf,
                    batch.pages,
                    batch.page_count,
                    Some(metadata),
                )
            }
            Err(raster_err) => {
                warn!(error = %raster_err, "rasterization failed; residual literal scan");
                let rescued = residual_rescue(&surface, &self.config);
                if !rescued.is_empty() {
                    return ParsedDocument::text(
                        DocumentKind::Pdf,
                        rescued,
                        Some(pdf_metadata(&surface, &self.config)),
                    );
                }
                // Structure with no recoverable text reads as a scanned
                // copy; a surface without any structure is corrupt.
                let err = if !has_structure(&surface, &self.config) {
                    LesewerkError::CorruptDocument("no structural markers located".into())
                } else if matches!(raster_err, LesewerkError::CorruptDocument(_)) {
                    raster_err
                } else {
                    LesewerkError::NoExtractableText
                };
                placeholders::for_error(&err, DocumentKind::Pdf, filename)
            }
        }
    }

    fn parse_text(&self, data: &[u8], filename: &str, kind: DocumentKind) -> ParsedDocument {
        match adapter::extract_plain_text(data) {
            Ok(text) => ParsedDocument::text(
                kind,
                clean_document(&text),
                Some(DocumentMetadata::titled(filename)),
            ),
            Err(err) => {
                warn!(error = %err, "plain-text adapter failed");
                placeholders::for_error(&err, kind, filename)
            }
        }
    }

    fn parse_word_processor(&self, data: &[u8], filename: &str) -> ParsedDocument {
        match adapter::extract_word_processor(data) {
            Ok(text) => {
                let cleaned = clean_document(&text);
                if cleaned.is_empty() {
                    placeholders::word_processor(filename)
                } else {
                    ParsedDocument::text(
                        DocumentKind::WordProcessor,
                        cleaned,
                        Some(DocumentMetadata::titled(filename)),
                    )
                }
            }
            Err(err) => {
                warn!(error = %err, "word-processor adapter failed");
                placeholders::word_processor(filename)
            }
        }
    }

    fn parse_unknown(&self, data: &[u8], filename: &str) -> ParsedDocument {
        debug!("unrecognized extension; attempting plain-text decode");
        match adapter::extract_plain_text(data) {
            Ok(text) => ParsedDocument::text(
                DocumentKind::PlainText,
                clean_document(&text),
                Some(DocumentMetadata::titled(filename)),
            ),
            Err(err) => {
                debug!(error = %err, "bytes do not decode as text");
                let unsupported = LesewerkError::UnsupportedFormat(
                    filename.rsplit('.').next().unwrap_or(filename).to_string(),
                );
                placeholders::for_error(&unsupported, DocumentKind::PlainText, filename)
            }
        }
    }
}

/// One-shot convenience with default heuristics.
pub async fn parse_document(data: &[u8], filename: &str) -> ParsedDocument {
    ExtractionEngine::new().parse_document(data, filename).await
}

// -- Helpers -----------------------------------------------------------------

/// Best-effort metadata scraped from the working surface. The page count
/// is an estimate from structural markers, not authoritative.
fn pdf_metadata(surface: &TextSurface, config: &HeuristicConfig) -> DocumentMetadata {
    let scrape = |re: &Regex| {
        re.captures(surface.as_str())
            .and_then(|c| clean_fragment(&c[1], config))
    };
    let markers = PAGE_MARKER.find_iter(surface.as_str()).count() as u32;
    DocumentMetadata {
        title: scrape(&INFO_TITLE),
        author: scrape(&INFO_AUTHOR),
        pages: (markers > 0).then_some(PageCount::Estimated(markers)),
        slides: None,
    }
}

/// Final aggressive attempt after a failed rasterization: collect whatever
/// parenthesized literals remain, with a lower acceptance bar (non-empty
/// instead of the usual minimum length).
fn residual_rescue(surface: &TextSurface, config: &HeuristicConfig) -> String {
    let fragments = ResidualLiteralScan.extract(surface, config);
    let mut parts = Vec::new();
    for fragment in fragments {
        if let Some(cleaned) = clean_fragment(&fragment, config) {
            parts.push(cleaned);
        }
    }
    clean_document(&parts.join(" "))
}

/// Whether the surface shows any sign of the structured-binary grammar.
fn has_structure(surface: &TextSurface, config: &HeuristicConfig) -> bool {
    surface.as_str().starts_with("%PDF-")
        || config
            .structural_keywords
            .iter()
            .any(|k| surface.as_str().contains(k.as_str()))
}
