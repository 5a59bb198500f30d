//! Surface text analysis: sentences, keywords and topics.
//!
//! Every function here is pure. The generator runs them once per input and
//! hands the results to the category generators.

use crate::lexicon::{is_stop_word, CAPITALIZED_PHRASE, NEWLINE_RUN, SENTENCE_BREAK};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashMap;

/// Sentences must be longer than this many characters to be kept
pub const MIN_SENTENCE_CHARS: usize = 20;
/// Tokens must be longer than this many characters to count as keywords
pub const MIN_KEYWORD_CHARS: usize = 3;
pub const MAX_KEYWORDS: usize = 15;
/// How many top keywords may be promoted to topics
pub const KEYWORD_TOPICS: usize = 5;
pub const MAX_TOPICS: usize = 8;

/// A keyword and the number of times it occurs in the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keyword {
    pub word: String,
    pub count: usize,
}

/// Intermediate result of the analysis stages.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Analysis {
    pub sentences: Vec<String>,
    pub keywords: Vec<Keyword>,
    pub topics: Vec<String>,
}

impl Analysis {
    /// Run sentence, keyword and topic extraction over `text`.
    ///
    /// Line breaks are joined first, so line wrapping never changes the
    /// outcome. Spaces within a line are left as they are.
    pub fn of(text: &str) -> Self {
        let text = join_lines(text);
        let sentences = split_sentences(&text);
        let keywords = extract_keywords(&text);
        let topics = identify_topics(&text, &keywords);
        Self {
            sentences,
            keywords,
            topics,
        }
    }
}

/// Split text into candidate sentences.
///
/// Line breaks become a single space, the text is split on runs of `.`,
/// `!` and `?`, and only trimmed pieces longer than [`MIN_SENTENCE_CHARS`]
/// survive. Terminators are not kept.
pub fn extract_sentences(text: &str) -> Vec<String> {
    split_sentences(&join_lines(text))
}

/// Replace every line break, and the whitespace around it, with one space
pub fn join_lines(text: &str) -> Cow<'_, str> {
    NEWLINE_RUN.replace_all(text, " ")
}

fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_BREAK
        .split(text)
        .map(str::trim)
        .filter(|piece| piece.chars().count() > MIN_SENTENCE_CHARS)
        .map(str::to_string)
        .collect()
}

/// Rank the distinct meaningful words of `text` by frequency.
///
/// Ties keep the order in which words were first seen.
pub fn extract_keywords(text: &str) -> Vec<Keyword> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for token in normalized.split_whitespace() {
        if token.chars().count() <= MIN_KEYWORD_CHARS || is_stop_word(token) {
            continue;
        }
        let count = counts.entry(token).or_insert(0);
        if *count == 0 {
            first_seen.push(token);
        }
        *count += 1;
    }

    let mut keywords: Vec<Keyword> = first_seen
        .into_iter()
        .map(|word| Keyword {
            word: word.to_string(),
            count: counts[word],
        })
        .collect();
    // Vec::sort_by is stable, so equal counts stay in first-seen order
    keywords.sort_by(|a, b| b.count.cmp(&a.count));
    keywords.truncate(MAX_KEYWORDS);
    keywords
}

/// Derive the topics a text talks about.
///
/// Capitalized phrases come first, in order of appearance. The top
/// [`KEYWORD_TOPICS`] keywords are appended when no topic already equals
/// them (ignoring case), and the list is capped at [`MAX_TOPICS`].
pub fn identify_topics(text: &str, keywords: &[Keyword]) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();

    for found in CAPITALIZED_PHRASE.find_iter(text) {
        let phrase = found.as_str();
        if phrase.chars().count() <= 3 || has_topic(&topics, phrase) {
            continue;
        }
        topics.push(phrase.to_string());
    }

    for keyword in keywords.iter().take(KEYWORD_TOPICS) {
        if !has_topic(&topics, &keyword.word) {
            topics.push(keyword.word.clone());
        }
    }

    topics.truncate(MAX_TOPICS);
    topics
}

fn has_topic(topics: &[String], candidate: &str) -> bool {
    let candidate = candidate.to_lowercase();
    topics.iter().any(|t| t.to_lowercase() == candidate)
}

/// Tidy a sentence for use as an answer.
///
/// Collapses whitespace, upper-cases the first character and makes sure the
/// text ends in `.`, `!` or `?`. Empty input stays empty.
pub fn clean_answer(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    let mut cleaned = match chars.next() {
        None => return String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    };
    if !cleaned.ends_with(['.', '!', '?']) {
        cleaned.push('.');
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentences_drop_short_pieces_and_terminators() {
        let text = "Short one. This sentence is long enough to keep!\nAnother fairly long sentence here?? ok";
        let sentences = extract_sentences(text);
        assert_eq!(
            sentences,
            vec![
                "This sentence is long enough to keep".to_string(),
                "Another fairly long sentence here".to_string(),
            ]
        );
    }

    #[test]
    fn sentences_join_wrapped_lines() {
        let text = "The installer copies every file\n\n\ninto the target directory.";
        assert_eq!(
            extract_sentences(text),
            vec!["The installer copies every file into the target directory".to_string()]
        );
    }

    #[test]
    fn sentences_keep_inner_space_runs() {
        let text = "Tiny    words   in   here. ";
        let expected = vec!["Tiny    words   in   here".to_string()];
        assert_eq!(extract_sentences(text), expected);
        assert_eq!(Analysis::of(text).sentences, expected);
    }

    #[test]
    fn join_lines_swallows_surrounding_whitespace() {
        assert_eq!(join_lines("Orbit \n\t Planner"), "Orbit Planner");
        assert_eq!(join_lines("a\r\n\r\nb"), "a b");
        assert_eq!(join_lines("no  breaks"), "no  breaks");
    }

    #[test]
    fn sentences_empty_input() {
        assert!(extract_sentences("").is_empty());
        assert!(extract_sentences("   \n  ").is_empty());
    }

    #[test]
    fn keywords_rank_by_count_then_first_seen() {
        let text = "Gardens need water. Gardens need sunlight. Compost feeds gardens, compost rots.";
        let keywords = extract_keywords(text);
        let words: Vec<&str> = keywords.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, vec!["gardens", "need", "compost", "water", "sunlight", "feeds", "rots"]);
        assert_eq!(keywords[0].count, 3);
        assert_eq!(keywords[1].count, 2);
    }

    #[test]
    fn keywords_strip_punctuation_and_stop_words() {
        let keywords = extract_keywords("Their e-mail (which arrived) wasn't about THIS project!");
        let words: Vec<&str> = keywords.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, vec!["mail", "arrived", "wasn", "project"]);
    }

    #[test]
    fn keywords_capped_at_fifteen() {
        let text = (0..30)
            .map(|i| format!("token{i:02}"))
            .collect::<Vec<_>>()
            .join(" ");
        let keywords = extract_keywords(&text);
        assert_eq!(keywords.len(), MAX_KEYWORDS);
        assert_eq!(keywords[0].word, "token00");
    }

    #[test]
    fn topics_prefer_capitalized_phrases() {
        let text = "Acme Cloud stores backups. The acme cloud dashboard shows backups and backups again.";
        let keywords = extract_keywords(text);
        let topics = identify_topics(text, &keywords);
        assert_eq!(topics[0], "Acme Cloud");
        assert!(topics.contains(&"backups".to_string()));
        // "The" is too short to be a topic
        assert!(!topics.iter().any(|t| t == "The"));
    }

    #[test]
    fn topics_dedupe_ignoring_case() {
        let text = "Rustacean meetups are fun. Rustacean folks like rustacean jokes.";
        let keywords = extract_keywords(text);
        let topics = identify_topics(text, &keywords);
        let count = topics
            .iter()
            .filter(|t| t.eq_ignore_ascii_case("rustacean"))
            .count();
        assert_eq!(count, 1);
        assert_eq!(topics[0], "Rustacean");
    }

    #[test]
    fn topics_capped_at_eight() {
        let text = "Alpha Beta. Gamma Delta. Epsilon Zeta. Theta Iota. Kappa Lambda. \
                    Omicron Sigma. Upsilon Omega. Orion Vega. Sirius Rigel. Castor Pollux.";
        let topics = identify_topics(text, &extract_keywords(text));
        assert_eq!(topics.len(), MAX_TOPICS);
        assert_eq!(topics[0], "Alpha Beta");
    }

    #[test]
    fn topics_empty_without_phrases_or_keywords() {
        assert!(identify_topics("a b c and the", &[]).is_empty());
    }

    #[test]
    fn clean_answer_normalizes_text() {
        assert_eq!(clean_answer("  hello   world "), "Hello world.");
        assert_eq!(clean_answer("already done!"), "Already done!");
        assert_eq!(clean_answer("is it?"), "Is it?");
        assert_eq!(clean_answer("   "), "");
    }

    #[test]
    fn clean_answer_on_joined_sentences() {
        let joined = ["first part of it", "second part of it"].join(". ");
        assert_eq!(clean_answer(&joined), "First part of it. Second part of it.");
    }
}
