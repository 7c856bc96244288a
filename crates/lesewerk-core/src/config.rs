// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Heuristic configuration for the extraction engine.
//
// Every keyword list, stopword table, scoring weight, and threshold the
// engine uses lives here as explicit data, so that tuning is a config
// change and the heuristics can be tested in isolation.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Scoring weights for the byte-decoding candidate scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceWeights {
    /// Bonus when the buffer starts with the PDF file signature.
    pub signature: f64,
    /// Bonus per structural keyword present (not per occurrence).
    pub keyword: f64,
    /// Bonus per text-showing operator occurrence.
    pub operator: f64,
    /// Multiplier applied to the readable-character ratio.
    pub readable_ratio: f64,
    /// Bonus when any high-frequency accented character appears, which
    /// indicates a correct multi-byte decoding rather than a single-byte
    /// misdecoding.
    pub accent: f64,
}

impl Default for SurfaceWeights {
    fn default() -> Self {
        Self {
            signature: 10.0,
            keyword: 5.0,
            operator: 2.0,
            readable_ratio: 25.0,
            accent: 10.0,
        }
    }
}

/// Bounds for the rasterization fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterOptions {
    /// Hard cap on rendered pages per document.
    pub max_pages: u32,
    /// Maximum rendered page width in pixels.
    pub max_width: u32,
    /// Maximum rendered page height in pixels.
    pub max_height: u32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            max_pages: 50,
            max_width: 1024,
            max_height: 1400,
        }
    }
}

/// All heuristic tables and thresholds used by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeuristicConfig {
    /// Minimum accumulated text length before the strategy chain
    /// short-circuits.
    pub min_text_len: usize,
    /// Structural keyword tokens scored during surface selection.
    pub structural_keywords: Vec<String>,
    /// High-frequency accented characters used as a decoding-quality signal.
    pub accented_chars: Vec<char>,
    /// Function words whose presence is a weak natural-language signal.
    pub stopwords: Vec<String>,
    /// Per-fragment garbage filter: minimum ratio of readable characters.
    pub min_fragment_ratio: f64,
    /// Classifier: minimum fraction of readable words.
    pub min_readable_word_ratio: f64,
    /// Classifier: garbled-match budget as a fraction of text length.
    pub max_garbled_fraction: f64,
    /// Classifier: readable-word count that substitutes for a stopword hit.
    pub min_readable_words: usize,
    pub surface_weights: SurfaceWeights,
    pub raster: RasterOptions,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            min_text_len: 20,
            structural_keywords: vec![
                "obj".into(),
                "endobj".into(),
                "stream".into(),
                "endstream".into(),
                "/Page".into(),
                "BT".into(),
            ],
            accented_chars: vec!['á', 'é', 'í', 'ó', 'ú', 'ñ', 'ã', 'ç', 'ü', 'è', 'à', 'ö'],
            stopwords: vec![
                // English
                "the".into(),
                "and".into(),
                "for".into(),
                "with".into(),
                "that".into(),
                "this".into(),
                "from".into(),
                "have".into(),
                // Spanish
                "que".into(),
                "los".into(),
                "las".into(),
                "por".into(),
                "para".into(),
                "con".into(),
                "una".into(),
                "del".into(),
            ],
            min_fragment_ratio: 0.2,
            min_readable_word_ratio: 0.6,
            max_garbled_fraction: 0.1,
            min_readable_words: 5,
            surface_weights: SurfaceWeights::default(),
            raster: RasterOptions::default(),
        }
    }
}

impl HeuristicConfig {
    /// Load a tuned configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a tuned configuration from a JSON file on disk.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// True for characters the heuristics treat as readable: printable
    /// ASCII plus the extended-Latin ranges (accented letters survive
    /// cleaning and scoring untouched).
    pub fn is_readable_char(c: char) -> bool {
        matches!(c, ' '..='~') || Self::is_extended_latin(c)
    }

    /// Extended-Latin letters (Latin-1 Supplement letters plus Latin
    /// Extended-A).
    pub fn is_extended_latin(c: char) -> bool {
        matches!(c, '\u{00C0}'..='\u{00FF}' | '\u{0100}'..='\u{017F}')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_are_populated() {
        let cfg = HeuristicConfig::default();
        assert_eq!(cfg.min_text_len, 20);
        assert!(cfg.structural_keywords.iter().any(|k| k == "endstream"));
        assert!(cfg.stopwords.iter().any(|w| w == "the"));
        assert!(cfg.stopwords.iter().any(|w| w == "que"));
    }

    #[test]
    fn readable_chars_cover_ascii_and_accents() {
        assert!(HeuristicConfig::is_readable_char('a'));
        assert!(HeuristicConfig::is_readable_char('é'));
        assert!(HeuristicConfig::is_readable_char('ş'));
        assert!(!HeuristicConfig::is_readable_char('\u{0003}'));
        assert!(!HeuristicConfig::is_readable_char('\u{2603}'));
    }

    #[test]
    fn config_loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("heuristics.json");

        let mut cfg = HeuristicConfig::default();
        cfg.min_text_len = 40;
        std::fs::write(&path, serde_json::to_string(&cfg).unwrap()).unwrap();

        let loaded = HeuristicConfig::load(&path).unwrap();
        assert_eq!(loaded.min_text_len, 40);

        // Missing files surface as I/O errors, not panics.
        assert!(HeuristicConfig::load(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = HeuristicConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back = HeuristicConfig::from_json(&json).unwrap();
        assert_eq!(back.min_text_len, cfg.min_text_len);
        assert_eq!(back.stopwords, cfg.stopwords);
    }
}
