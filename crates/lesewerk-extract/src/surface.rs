// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Byte decoder/scorer — turns a raw buffer into the working text surface.
//
// The buffer is decoded with several candidate byte-to-character mappings
// and each candidate is scored for document-structure plausibility. The
// best-scoring candidate becomes the immutable surface every extraction
// strategy reads from.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use lesewerk_core::HeuristicConfig;

/// Single-string show operator: `(...) Tj`.
static TJ_OPERATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\)\s*Tj").unwrap());
/// Array show operator: `[...] TJ`.
static TJ_ARRAY_OPERATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\]\s*TJ").unwrap());

/// The byte-to-character decodings tried, in priority order. Ties in the
/// plausibility score favor the earlier decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEncoding {
    /// Lossy UTF-8, correct for modern producers.
    Utf8,
    /// Windows-1252 single-byte Latin.
    Windows1252,
    /// ASCII only; high bytes blanked out.
    Ascii,
    /// Raw: every byte as the identical code point (Latin-1 transparent).
    Raw,
}

/// The selected working text surface.
///
/// Never mutated after selection; strategies borrow the text read-only.
#[derive(Debug, Clone)]
pub struct TextSurface {
    text: String,
    encoding: SurfaceEncoding,
    score: f64,
}

impl TextSurface {
    /// Decode the buffer with every candidate encoding, score each result,
    /// and keep the winner.
    #[instrument(skip_all, fields(len = data.len()))]
    pub fn decode_best(data: &[u8], config: &HeuristicConfig) -> Self {
        let candidates = [
            (SurfaceEncoding::Utf8, decode_utf8(data)),
            (SurfaceEncoding::Windows1252, decode_windows_1252(data)),
            (SurfaceEncoding::Ascii, decode_ascii(data)),
            (SurfaceEncoding::Raw, decode_raw(data)),
        ];

        let mut best: Option<TextSurface> = None;
        for (encoding, text) in candidates {
            let score = plausibility_score(&text, config);
            debug!(?encoding, score, "surface candidate scored");
            // Strictly-greater keeps the earliest candidate on ties.
            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(TextSurface {
                    text,
                    encoding,
                    score,
                });
            }
        }

        // The candidate list is non-empty, so a winner always exists.
        let surface = best.unwrap_or_else(|| TextSurface {
            text: String::new(),
            encoding: SurfaceEncoding::Utf8,
            score: 0.0,
        });
        debug!(encoding = ?surface.encoding, score = surface.score, "surface selected");
        surface
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn encoding(&self) -> SurfaceEncoding {
        self.encoding
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

fn decode_utf8(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}

fn decode_windows_1252(data: &[u8]) -> String {
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(data);
    text.into_owned()
}

fn decode_ascii(data: &[u8]) -> String {
    data.iter()
        .map(|&b| if b.is_ascii() { b as char } else { ' ' })
        .collect()
}

fn decode_raw(data: &[u8]) -> String {
    data.iter().map(|&b| b as char).collect()
}

/// Structure-plausibility score for one decoded candidate.
///
/// Rewards the PDF signature, structural keywords, text-showing operators,
/// a high ratio of readable characters, and the presence of common accented
/// characters (a correct multi-byte decoding produces `é`; a single-byte
/// misdecoding produces mojibake instead).
pub fn plausibility_score(text: &str, config: &HeuristicConfig) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let w = &config.surface_weights;
    let mut score = 0.0;

    if text.starts_with("%PDF-") {
        score += w.signature;
    }

    for keyword in &config.structural_keywords {
        if text.contains(keyword.as_str()) {
            score += w.keyword;
        }
    }

    let operators = TJ_OPERATOR.find_iter(text).count() + TJ_ARRAY_OPERATOR.find_iter(text).count();
    score += w.operator * operators as f64;

    let total = text.chars().count();
    let readable = text
        .chars()
        .filter(|&c| HeuristicConfig::is_readable_char(c))
        .count();
    score += w.readable_ratio * readable as f64 / total as f64;

    if config.accented_chars.iter().any(|&c| text.contains(c)) {
        score += w.accent;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> HeuristicConfig {
        HeuristicConfig::default()
    }

    #[test]
    fn pdf_signature_and_operators_raise_the_score() {
        let plain = plausibility_score("hello there", &cfg());
        let pdfish = plausibility_score("%PDF-1.4 1 0 obj BT (hi) Tj ET endobj", &cfg());
        assert!(pdfish > plain);
    }

    #[test]
    fn utf8_wins_for_accented_text() {
        let data = "Prólogo: canción y corazón".as_bytes();
        let surface = TextSurface::decode_best(data, &cfg());
        assert_eq!(surface.encoding(), SurfaceEncoding::Utf8);
        assert!(surface.as_str().contains("canción"));
    }

    #[test]
    fn empty_buffer_yields_an_empty_surface() {
        let surface = TextSurface::decode_best(b"", &cfg());
        assert!(surface.as_str().is_empty());
        assert_eq!(surface.score(), 0.0);
    }

    #[test]
    fn ties_favor_the_first_candidate() {
        // Pure ASCII decodes identically everywhere, so UTF-8 must win.
        let surface = TextSurface::decode_best(b"plain ascii text", &cfg());
        assert_eq!(surface.encoding(), SurfaceEncoding::Utf8);
    }

    #[test]
    fn binary_garbage_scores_low() {
        let data: Vec<u8> = (0u8..=255).cycle().take(512).collect();
        let surface = TextSurface::decode_best(&data, &cfg());
        assert!(surface.score() < 40.0);
    }
}
