// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Multi-strategy text extractor.
//
// An ordered chain of strategies, each scanning the working surface for
// literal text in a different way. The runner cleans every fragment
// individually, accumulates the survivors, and stops after the first
// strategy that pushes the accumulated text past the minimum length.
// Reordering or removing a strategy is a data change in `strategy_chain`,
// not a control-flow change.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use lesewerk_core::HeuristicConfig;

use crate::clean::clean_fragment;
use crate::surface::TextSurface;

// -- Shared patterns --------------------------------------------------------

/// `BT .. ET` text blocks.
static TEXT_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)BT(.*?)ET").unwrap());
/// `stream .. endstream` regions.
static STREAM_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)stream(.*?)endstream").unwrap());
/// `N G obj .. endobj` indirect objects.
static OBJECT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\d+\s+\d+\s+obj(.*?)endobj").unwrap());
/// Single-string show operator: `(literal) Tj`.
static SHOW_SINGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\(((?:\\.|[^\\()])*)\)\s*Tj").unwrap());
/// Array show operator: `[ .. ] TJ`.
static SHOW_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[((?:\\.|[^\\\[\]])*)\]\s*TJ").unwrap());
/// Any parenthesized literal.
static LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\(((?:\\.|[^\\()])+)\)").unwrap());
/// Form-field values: `/V (literal)`.
static FORM_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/V\s*\(((?:\\.|[^\\()])*)\)").unwrap());
/// Document-info and annotation keys followed by a literal.
static INFO_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)/(?:Title|Subject|Author|Keywords|Contents)\s*\(((?:\\.|[^\\()])*)\)").unwrap()
});
/// Tokens the raw fallback treats as structural noise: object/stream
/// markers, xref bookkeeping, and stream filter/codec names.
static NOISE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)^(
            obj|endobj|stream|endstream|xref|startxref|trailer|
            /?FlateDecode|/?DCTDecode|/?LZWDecode|/?ASCIIHexDecode|/?ASCII85Decode|
            /\w*
        )$",
    )
    .unwrap()
});
/// Bare integers and decimal literals.
static NUMERIC_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").unwrap());
/// All-caps tokens of three or more letters (operator soup, never prose).
static ALL_CAPS_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{3,}$").unwrap());

/// Pull the payloads of every show operator inside one region: single-string
/// `Tj` operands plus each literal inside `TJ` arrays.
fn show_operator_payloads(region: &str) -> Vec<String> {
    let mut payloads: Vec<String> = SHOW_SINGLE
        .captures_iter(region)
        .map(|c| c[1].to_string())
        .collect();
    for array in SHOW_ARRAY.captures_iter(region) {
        for literal in LITERAL.captures_iter(&array[1]) {
            payloads.push(literal[1].to_string());
        }
    }
    payloads
}

// -- Strategy trait and implementations -------------------------------------

/// One way of recovering literal text fragments from the working surface.
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Scan the surface and return raw (uncleaned) literal fragments.
    fn extract(&self, surface: &TextSurface, config: &HeuristicConfig) -> Vec<String>;
}

/// 1. Show operators inside `BT..ET` text blocks, the well-formed path.
pub struct TextBlockScan;

impl ExtractionStrategy for TextBlockScan {
    fn name(&self) -> &'static str {
        "text-block"
    }

    fn extract(&self, surface: &TextSurface, _config: &HeuristicConfig) -> Vec<String> {
        TEXT_BLOCK
            .captures_iter(surface.as_str())
            .flat_map(|block| show_operator_payloads(&block[1]))
            .collect()
    }
}

/// 2. Show operators inside `stream..endstream` regions. Compressed streams
/// that were stored without encoding (or decoded upstream) still carry
/// literal operator text.
pub struct StreamScan;

impl ExtractionStrategy for StreamScan {
    fn name(&self) -> &'static str {
        "stream"
    }

    fn extract(&self, surface: &TextSurface, _config: &HeuristicConfig) -> Vec<String> {
        STREAM_BLOCK
            .captures_iter(surface.as_str())
            .flat_map(|block| show_operator_payloads(&block[1]))
            .collect()
    }
}

/// 3. Show operators inside indirect `obj..endobj` bodies.
pub struct ObjectScan;

impl ExtractionStrategy for ObjectScan {
    fn name(&self) -> &'static str {
        "object"
    }

    fn extract(&self, surface: &TextSurface, _config: &HeuristicConfig) -> Vec<String> {
        OBJECT_BLOCK
            .captures_iter(surface.as_str())
            .flat_map(|block| show_operator_payloads(&block[1]))
            .collect()
    }
}

/// 4. Show operators anywhere on the surface, ignoring block and object
/// boundaries. Catches malformed documents whose markers are damaged.
pub struct GlobalOperatorScan;

impl ExtractionStrategy for GlobalOperatorScan {
    fn name(&self) -> &'static str {
        "global-operator"
    }

    fn extract(&self, surface: &TextSurface, _config: &HeuristicConfig) -> Vec<String> {
        show_operator_payloads(surface.as_str())
    }
}

/// 5. Values of interactive form fields (`/V` entries).
pub struct FormFieldScan;

impl ExtractionStrategy for FormFieldScan {
    fn name(&self) -> &'static str {
        "form-field"
    }

    fn extract(&self, surface: &TextSurface, _config: &HeuristicConfig) -> Vec<String> {
        FORM_VALUE
            .captures_iter(surface.as_str())
            .map(|c| c[1].to_string())
            .collect()
    }
}

/// 6. Document-info entries (title, subject, author, keywords) and
/// annotation contents.
pub struct MetadataScan;

impl ExtractionStrategy for MetadataScan {
    fn name(&self) -> &'static str {
        "metadata"
    }

    fn extract(&self, surface: &TextSurface, _config: &HeuristicConfig) -> Vec<String> {
        INFO_VALUE
            .captures_iter(surface.as_str())
            .map(|c| c[1].to_string())
            .collect()
    }
}

/// 7. Raw fallback: strip everything non-printable, then filter out
/// structural tokens and keep whatever prose-like residue remains.
pub struct RawTextScan;

impl ExtractionStrategy for RawTextScan {
    fn name(&self) -> &'static str {
        "raw-text"
    }

    fn extract(&self, surface: &TextSurface, config: &HeuristicConfig) -> Vec<String> {
        let printable: String = surface
            .as_str()
            .chars()
            .map(|c| {
                if HeuristicConfig::is_readable_char(c) {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        let kept: Vec<&str> = printable
            .split_whitespace()
            .filter(|token| {
                !NOISE_TOKEN.is_match(token)
                    && !NUMERIC_TOKEN.is_match(token)
                    && !ALL_CAPS_TOKEN.is_match(token)
            })
            .collect();

        let text = kept.join(" ");
        if text.len() >= config.min_text_len {
            vec![text]
        } else {
            Vec::new()
        }
    }
}

/// 8. Last resort: any parenthesized literal payload left on the surface.
pub struct ResidualLiteralScan;

impl ExtractionStrategy for ResidualLiteralScan {
    fn name(&self) -> &'static str {
        "residual-literal"
    }

    fn extract(&self, surface: &TextSurface, _config: &HeuristicConfig) -> Vec<String> {
        LITERAL
            .captures_iter(surface.as_str())
            .map(|c| c[1].to_string())
            .filter(|payload| payload.len() >= 2)
            .collect()
    }
}

// -- Chain and runner --------------------------------------------------------

/// The fixed strategy order, most-structured first.
pub fn strategy_chain() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![
        Box::new(TextBlockScan),
        Box::new(StreamScan),
        Box::new(ObjectScan),
        Box::new(GlobalOperatorScan),
        Box::new(FormFieldScan),
        Box::new(MetadataScan),
        Box::new(RawTextScan),
        Box::new(ResidualLiteralScan),
    ]
}

/// Run the chain over the surface, cleaning each fragment as it arrives.
///
/// Returns the accumulated cleaned text, which may be empty when nothing
/// survived cleaning. The chain short-circuits after the first strategy
/// whose output pushes the accumulation past `min_text_len`.
#[instrument(skip_all, fields(surface_len = surface.as_str().len()))]
pub fn run_chain(surface: &TextSurface, config: &HeuristicConfig) -> String {
    let mut accumulated = String::new();

    for strategy in strategy_chain() {
        let fragments = strategy.extract(surface, config);
        let mut accepted = 0usize;
        for fragment in &fragments {
            if let Some(cleaned) = clean_fragment(fragment, config) {
                if !accumulated.is_empty() {
                    accumulated.push(' ');
                }
                accumulated.push_str(&cleaned);
                accepted += 1;
            }
        }
        debug!(
            strategy = strategy.name(),
            scanned = fragments.len(),
            accepted,
            accumulated_len = accumulated.len(),
            "strategy pass complete"
        );
        if accumulated.len() >= config.min_text_len {
            break;
        }
    }

    accumulated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface_of(text: &str) -> TextSurface {
        TextSurface::decode_best(text.as_bytes(), &HeuristicConfig::default())
    }

    fn cfg() -> HeuristicConfig {
        HeuristicConfig::default()
    }

    #[test]
    fn text_block_scan_finds_show_operators() {
        let surface = surface_of("1 0 obj BT /F1 12 Tf (Hello World) Tj ET endobj");
        let fragments = TextBlockScan.extract(&surface, &cfg());
        assert_eq!(fragments, vec!["Hello World".to_string()]);
    }

    #[test]
    fn array_show_operators_yield_every_literal() {
        let surface = surface_of("BT [(Hel) -20 (lo)] TJ ET");
        let fragments = TextBlockScan.extract(&surface, &cfg());
        assert_eq!(fragments, vec!["Hel".to_string(), "lo".to_string()]);
    }

    #[test]
    fn stream_scan_reaches_text_without_blocks() {
        let surface = surface_of("stream\n(Inside a stream) Tj\nendstream");
        let fragments = StreamScan.extract(&surface, &cfg());
        assert_eq!(fragments, vec!["Inside a stream".to_string()]);
    }

    #[test]
    fn form_field_scan_reads_values() {
        let surface = surface_of("<< /T (name) /V (John Smith) >>");
        let fragments = FormFieldScan.extract(&surface, &cfg());
        assert_eq!(fragments, vec!["John Smith".to_string()]);
    }

    #[test]
    fn metadata_scan_reads_info_keys() {
        let surface = surface_of("<< /Title (Annual Report) /Author (M. Duval) >>");
        let fragments = MetadataScan.extract(&surface, &cfg());
        assert_eq!(
            fragments,
            vec!["Annual Report".to_string(), "M. Duval".to_string()]
        );
    }

    #[test]
    fn raw_text_scan_drops_structural_noise() {
        let surface = surface_of(
            "1 0 obj stream FlateDecode 612 792 0.5 ABC \
             the quick brown fox jumps over the lazy dog endstream endobj",
        );
        let fragments = RawTextScan.extract(&surface, &cfg());
        assert_eq!(fragments.len(), 1);
        let text = &fragments[0];
        assert!(text.contains("quick brown fox"));
        assert!(!text.contains("FlateDecode"));
        assert!(!text.contains("612"));
        assert!(!text.contains("ABC"));
        assert!(!text.contains("endobj"));
    }

    #[test]
    fn residual_scan_collects_leftover_literals() {
        let surface = surface_of("damaged content (still here) more damage (and here)");
        let fragments = ResidualLiteralScan.extract(&surface, &cfg());
        assert_eq!(
            fragments,
            vec!["still here".to_string(), "and here".to_string()]
        );
    }

    #[test]
    fn chain_short_circuits_on_the_first_productive_strategy() {
        let surface = surface_of("BT (This sentence is long enough to stop.) Tj ET (leftover)");
        let text = run_chain(&surface, &cfg());
        assert!(text.contains("This sentence is long enough to stop."));
        assert!(!text.contains("leftover"));
    }

    #[test]
    fn escaped_parens_are_preserved_through_cleaning() {
        let surface = surface_of(r"BT (balance \(net\) due) Tj ET");
        let text = run_chain(&surface, &cfg());
        assert!(text.contains("balance (net) due"));
    }

    #[test]
    fn chain_returns_empty_for_empty_surface() {
        let surface = surface_of("");
        assert!(run_chain(&surface, &cfg()).is_empty());
    }
}
