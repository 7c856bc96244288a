// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Readability classifier — decides whether extracted text is genuine prose
// or parser noise that happened to survive cleaning.
//
// Three independent heuristics are conjoined so short snippets with a few
// real words still pass, while dense operator/structure noise fails:
// a readable-word ratio, a garbled-match budget, and a weak
// natural-language signal (stopword presence or enough readable words).

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use lesewerk_core::HeuristicConfig;

/// Stray structural characters that rarely appear in prose.
static STRAY_SYMBOLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[\]\\|^`{}<>]").unwrap());
/// Runs of three or more spaces.
static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {3,}").unwrap());
/// Runs of three or more consecutive uppercase letters.
static UPPER_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]{3,}").unwrap());

/// Count matches against the noise patterns.
pub fn garbled_score(text: &str) -> usize {
    let stray = STRAY_SYMBOLS.find_iter(text).count();
    let unreadable = text
        .chars()
        .filter(|&c| !HeuristicConfig::is_readable_char(c) && !c.is_whitespace())
        .count();
    let space_runs = SPACE_RUNS.find_iter(text).count();
    let upper_runs = UPPER_RUNS.find_iter(text).count();
    stray + unreadable + space_runs + upper_runs
}

/// A token reads as a word when it is entirely printable ASCII or entirely
/// extended-Latin letters (mixed mojibake fails both arms).
fn is_readable_word(token: &str) -> bool {
    token.chars().all(|c| matches!(c, '!'..='~'))
        || token
            .chars()
            .all(|c| c.is_ascii_alphabetic() || HeuristicConfig::is_extended_latin(c))
}

/// Fraction and count of readable words among tokens longer than two
/// characters.
pub fn readable_words(text: &str) -> (f64, usize) {
    let tokens: Vec<&str> = text.split_whitespace().filter(|t| t.len() > 2).collect();
    if tokens.is_empty() {
        return (0.0, 0);
    }
    let readable = tokens.iter().filter(|t| is_readable_word(t)).count();
    (readable as f64 / tokens.len() as f64, readable)
}

/// Whether any configured stopword appears, case-insensitively.
pub fn has_stopword(text: &str, config: &HeuristicConfig) -> bool {
    let lower = text.to_lowercase();
    config.stopwords.iter().any(|w| lower.contains(w.as_str()))
}

/// Classify the fully cleaned text.
///
/// Readable iff the readable-word ratio clears the floor, the garbled
/// score stays under its budget, and either a stopword appears or enough
/// readable words were found.
pub fn is_readable(text: &str, config: &HeuristicConfig) -> bool {
    if text.is_empty() {
        return false;
    }

    let (ratio, count) = readable_words(text);
    let garbled = garbled_score(text);
    let garbled_budget = (text.len() as f64 * config.max_garbled_fraction) as usize;
    let language_signal = has_stopword(text, config) || count > config.min_readable_words;

    let readable = ratio > config.min_readable_word_ratio
        && garbled < garbled_budget.max(1)
        && language_signal;

    debug!(
        ratio,
        readable_count = count,
        garbled,
        garbled_budget,
        language_signal,
        readable,
        "classified extracted text"
    );
    readable
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> HeuristicConfig {
        HeuristicConfig::default()
    }

    #[test]
    fn ordinary_prose_is_readable() {
        let text = "The committee reviewed the proposal and approved the budget for next year.";
        assert!(is_readable(text, &cfg()));
    }

    #[test]
    fn accented_prose_is_readable() {
        let text = "La canción que escribió para los niños del pueblo fue un éxito.";
        assert!(is_readable(text, &cfg()));
    }

    #[test]
    fn operator_soup_is_rejected() {
        let text = "q 0.1 w [] 0 d BT /F1 `12` Tf 72 712 Td ET Q ^ | \\ [ ]";
        assert!(!is_readable(text, &cfg()));
    }

    #[test]
    fn short_snippet_with_real_words_passes() {
        // Too few words to clear the count arm, but a stopword carries it.
        assert!(is_readable("in the garden", &cfg()));
    }

    #[test]
    fn empty_text_is_not_readable() {
        assert!(!is_readable("", &cfg()));
    }

    #[test]
    fn garbled_score_counts_noise_patterns() {
        assert_eq!(garbled_score("clean words only"), 0);
        assert!(garbled_score("a [b] \\c |d    XYZW") >= 5);
    }

    #[test]
    fn mojibake_words_are_not_readable_words() {
        let (ratio, _) = readable_words("Ã©tÃ¼de Ã±ope");
        assert!(ratio < 0.6);
    }
}
