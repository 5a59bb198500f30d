//! Fixed lexical tables used by the FAQ pipeline.
//!
//! Stop words, indicator sets and the compiled patterns live here so every
//! stage reads from the same immutable data.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Common English function words excluded from keyword extraction.
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him",
    "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "may", "me", "might", "more",
    "most", "must", "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or",
    "other", "our", "ours", "out", "over", "own", "same", "shall", "she", "should", "so", "some",
    "such", "than", "that", "the", "their", "them", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what",
    "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you",
    "your", "yours",
];

/// Words marking a sentence as describing a process or procedure.
pub const PROCESS_INDICATORS: &[&str] = &[
    "step",
    "process",
    "method",
    "way",
    "approach",
    "procedure",
    "guide",
    "tutorial",
    "instruction",
];

/// Words marking a sentence as describing a feature.
pub const FEATURE_INDICATORS: &[&str] = &[
    "feature",
    "capability",
    "function",
    "option",
    "include",
    "provide",
    "offer",
    "support",
    "enable",
    "allow",
];

/// Words marking a sentence as describing a benefit.
pub const BENEFIT_INDICATORS: &[&str] = &[
    "benefit",
    "advantage",
    "improve",
    "help",
    "save",
    "increase",
    "reduce",
    "better",
    "efficient",
    "effective",
];

lazy_static! {
    /// Stop words as a set for constant-time membership checks.
    pub static ref STOP_WORD_SET: HashSet<&'static str> = STOP_WORDS.iter().copied().collect();

    /// Runs of sentence terminators.
    pub static ref SENTENCE_BREAK: Regex = Regex::new(r"[.!?]+").unwrap();

    /// A line break together with the whitespace around it.
    pub static ref NEWLINE_RUN: Regex = Regex::new(r"\s*\n\s*").unwrap();

    /// Sequences of capitalized words, e.g. "Acme Cloud Console".
    pub static ref CAPITALIZED_PHRASE: Regex =
        Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b").unwrap();

    /// Ordinal and sequencing cues that mark a step in a walkthrough.
    pub static ref STEP_SEQUENCE: Regex =
        Regex::new(r"(?i)first|second|third|then|next|finally|step \d+").unwrap();

    /// Sentences saying something can be changed or adjusted.
    pub static ref CUSTOMIZE_CUE: Regex = Regex::new(r"(?i)can|able|possible|support|allow").unwrap();

    /// Sentences stating a prerequisite.
    pub static ref REQUIREMENT_CUE: Regex =
        Regex::new(r"(?i)require|need|must|necessary|prerequisite").unwrap();

    /// Sentences pointing at where something can be found.
    pub static ref LOCATION_CUE: Regex =
        Regex::new(r"(?i)find|locate|access|available|download").unwrap();
}

/// Check whether a lowercase token is a stop word
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORD_SET.contains(word)
}

/// Check whether `text` contains any of `indicators`, ignoring case
pub fn contains_any(text: &str, indicators: &[&str]) -> bool {
    let lower = text.to_lowercase();
    indicators.iter().any(|word| lower.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_word_table_is_lowercase_and_unique() {
        assert_eq!(STOP_WORD_SET.len(), STOP_WORDS.len());
        assert!(STOP_WORDS.iter().all(|w| w.chars().all(|c| c.is_ascii_lowercase())));
        assert!(STOP_WORDS.len() >= 90);
    }

    #[test]
    fn contains_any_ignores_case() {
        assert!(contains_any("Follow the PROCESS below", PROCESS_INDICATORS));
        assert!(!contains_any("Nothing relevant here", BENEFIT_INDICATORS));
    }

    #[test]
    fn step_sequence_matches_numbered_steps() {
        assert!(STEP_SEQUENCE.is_match("In Step 2 you configure the printer"));
        assert!(STEP_SEQUENCE.is_match("Finally, restart the service"));
        assert!(!STEP_SEQUENCE.is_match("Steps are listed in the appendix"));
    }
}
