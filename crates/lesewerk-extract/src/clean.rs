// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text cleaner — per-fragment unescaping and filtering, plus the final
// whole-document whitespace normalization.
//
// Fragments are cleaned one at a time so a garbled fragment is rejected on
// its own instead of contaminating the good fragments around it.

use std::sync::LazyLock;

use regex::Regex;

use lesewerk_core::HeuristicConfig;

static CARRIAGE_RETURNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n?").unwrap());
static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static SPACE_AROUND_NEWLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" *\n *").unwrap());
static NEWLINE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static WHITESPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Clean one extracted literal payload.
///
/// Un-escapes PDF string escapes, replaces control characters with spaces
/// (accented extended-Latin characters pass through untouched), collapses
/// whitespace, and rejects the fragment entirely when fewer than
/// `min_fragment_ratio` of its characters are readable.
pub fn clean_fragment(raw: &str, config: &HeuristicConfig) -> Option<String> {
    let unescaped = unescape_literal(raw);

    let total = unescaped.chars().count();
    if total == 0 {
        return None;
    }
    let readable = unescaped
        .chars()
        .filter(|&c| HeuristicConfig::is_readable_char(c))
        .count();
    if (readable as f64 / total as f64) < config.min_fragment_ratio {
        return None;
    }

    let stripped: String = unescaped
        .chars()
        .map(|c| if (c as u32) < 0x20 { ' ' } else { c })
        .collect();
    let collapsed = WHITESPACE_RUNS.replace_all(&stripped, " ");
    let trimmed = collapsed.trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Un-escape PDF string-literal escape sequences.
///
/// Named escapes map to their control characters; any other escaped
/// character (parens, backslash, slash, regex metacharacters) maps to the
/// character itself.
pub fn unescape_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            // Trailing lone backslash.
            None => out.push('\\'),
        }
    }
    out
}

/// Normalize the concatenation of all accepted fragments.
///
/// Folds CRLF and bare CR line endings to LF, collapses space runs,
/// strips indentation after newlines, and clamps three or more
/// consecutive newlines to exactly two. Idempotent:
/// `clean_document(clean_document(x)) == clean_document(x)`.
pub fn clean_document(text: &str) -> String {
    let unixed = CARRIAGE_RETURNS.replace_all(text, "\n");
    let spaces = SPACE_RUNS.replace_all(&unixed, " ");
    let edges = SPACE_AROUND_NEWLINE.replace_all(&spaces, "\n");
    let newlines = NEWLINE_RUNS.replace_all(&edges, "\n\n");
    newlines.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> HeuristicConfig {
        HeuristicConfig::default()
    }

    #[test]
    fn unescapes_parens_and_named_sequences() {
        assert_eq!(unescape_literal(r"a \(quoted\) part"), "a (quoted) part");
        assert_eq!(unescape_literal(r"line\nnext\ttab"), "line\nnext\ttab");
        assert_eq!(unescape_literal(r"back\\slash \/ slash"), r"back\slash / slash");
    }

    #[test]
    fn control_characters_are_removed() {
        let cleaned = clean_fragment("He\u{0002}llo\u{0001} wor\u{0007}ld", &cfg()).unwrap();
        assert_eq!(cleaned, "He llo wor ld");
    }

    #[test]
    fn accented_characters_survive_cleaning() {
        let cleaned = clean_fragment("café,  naïve", &cfg()).unwrap();
        assert_eq!(cleaned, "café, naïve");
    }

    #[test]
    fn mostly_unreadable_fragments_are_rejected() {
        // Over 80% of the characters are outside the readable set.
        let garbage: String = "\u{0601}\u{0602}\u{0603}\u{0604}\u{0605}a".repeat(4);
        assert!(clean_fragment(&garbage, &cfg()).is_none());
        assert!(clean_fragment("", &cfg()).is_none());
        assert!(clean_fragment("   ", &cfg()).is_none());
    }

    #[test]
    fn document_cleaning_is_idempotent() {
        let samples = [
            "a   b\t c\n\n\n\nd",
            "  leading\n   indented\nend  ",
            "already clean",
            "",
            "x\n\ny",
            "cr\r\nlf\rmixed\r\n\r\nend",
        ];
        for s in samples {
            let once = clean_document(s);
            assert_eq!(clean_document(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn document_cleaning_clamps_blank_lines() {
        assert_eq!(clean_document("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(clean_document("a   \n   b"), "a\nb");
    }

    #[test]
    fn carriage_returns_normalize_to_newlines() {
        assert_eq!(clean_document("a\r\nb"), "a\nb");
        assert_eq!(clean_document("a\rb"), "a\nb");
        // CRLF blank-line runs clamp the same as LF ones.
        assert_eq!(clean_document("a\r\n\r\n\r\nb"), "a\n\nb");
        assert_eq!(clean_document("a  \r\n  b"), "a\nb");
    }
}
