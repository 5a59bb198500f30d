//! Heuristic FAQ generation.
//!
//! Five category generators scan the sentences and topics of a text and
//! propose question/answer pairs. Candidates are concatenated in category
//! order, near-duplicate questions are dropped and the result is capped.

use crate::analysis::{clean_answer, Analysis};
use crate::faq::Faq;
use crate::lexicon::{
    contains_any, BENEFIT_INDICATORS, CUSTOMIZE_CUE, FEATURE_INDICATORS, LOCATION_CUE,
    PROCESS_INDICATORS, REQUIREMENT_CUE, STEP_SEQUENCE,
};
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

/// Upper bound on the number of FAQs returned for one text
pub const MAX_FAQS: usize = 10;
/// Topics considered for "What is ..." questions
const DEFINITION_TOPICS: usize = 3;
const MAX_PROCESS_FAQS: usize = 2;
const MAX_STEP_SENTENCES: usize = 3;
/// Sentences joined into feature and benefit answers
const JOINED_SENTENCES: usize = 2;

/// The kinds of question the generator knows how to ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Definition,
    Process,
    Feature,
    Benefit,
    General,
}

impl Category {
    /// All categories, in the order their candidates are merged
    pub const ALL: [Category; 5] = [
        Category::Definition,
        Category::Process,
        Category::Feature,
        Category::Benefit,
        Category::General,
    ];

    /// Propose candidate FAQs for this category
    pub fn generate(self, sentences: &[String], topics: &[String]) -> Vec<Faq> {
        match self {
            Category::Definition => definition_faqs(sentences, topics),
            Category::Process => process_faqs(sentences, topics),
            Category::Feature => feature_faqs(sentences, topics),
            Category::Benefit => benefit_faqs(sentences, topics),
            Category::General => general_faqs(sentences, topics),
        }
    }
}

/// Generate up to [`MAX_FAQS`] question/answer pairs from free text.
///
/// Empty or whitespace-only input yields no FAQs.
pub fn generate_faqs(text: &str) -> Vec<Faq> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let analysis = Analysis::of(text);
    debug!(
        sentences = analysis.sentences.len(),
        keywords = analysis.keywords.len(),
        topics = analysis.topics.len(),
        "Analyzed input text"
    );

    let mut candidates = Vec::new();
    for category in Category::ALL {
        let faqs = category.generate(&analysis.sentences, &analysis.topics);
        debug!(?category, candidates = faqs.len(), "Generated candidates");
        candidates.extend(faqs);
    }

    dedupe_and_rank(candidates)
}

/// Drop questions whose normalized key was already seen, then cap the list.
///
/// Order is preserved; the first occurrence of a question wins.
pub fn dedupe_and_rank(candidates: Vec<Faq>) -> Vec<Faq> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|faq| seen.insert(faq.question_key()))
        .take(MAX_FAQS)
        .collect()
}

/// "What is X?" for the leading topics, answered by the first sentence
/// mentioning each one.
pub fn definition_faqs(sentences: &[String], topics: &[String]) -> Vec<Faq> {
    topics
        .iter()
        .take(DEFINITION_TOPICS)
        .filter_map(|topic| {
            sentences
                .iter()
                .find(|sentence| mentions(sentence, topic))
                .map(|sentence| Faq::new(format!("What is {topic}?"), clean_answer(sentence)))
        })
        .collect()
}

/// "How does X work?" for procedural sentences, plus a getting-started
/// question built from step-by-step sentences.
pub fn process_faqs(sentences: &[String], topics: &[String]) -> Vec<Faq> {
    let mut faqs: Vec<Faq> = sentences
        .iter()
        .filter(|sentence| contains_any(sentence, PROCESS_INDICATORS))
        .filter_map(|sentence| {
            topics
                .iter()
                .find(|topic| mentions(sentence, topic))
                .map(|topic| Faq::new(format!("How does {topic} work?"), clean_answer(sentence)))
        })
        .collect();

    if let Some(subject) = topics.first() {
        let steps: Vec<&str> = sentences
            .iter()
            .filter(|sentence| STEP_SEQUENCE.is_match(sentence))
            .take(MAX_STEP_SENTENCES)
            .map(String::as_str)
            .collect();
        if !steps.is_empty() {
            faqs.push(Faq::new(
                format!("How do I get started with {subject}?"),
                clean_answer(&steps.join(". ")),
            ));
        }
    }

    faqs.truncate(MAX_PROCESS_FAQS);
    faqs
}

/// "What features does X offer?" from sentences describing capabilities.
pub fn feature_faqs(sentences: &[String], topics: &[String]) -> Vec<Faq> {
    joined_faq(sentences, topics, FEATURE_INDICATORS, |subject| {
        format!("What features does {subject} offer?")
    })
}

/// "Why should I use X?" from sentences describing benefits.
pub fn benefit_faqs(sentences: &[String], topics: &[String]) -> Vec<Faq> {
    joined_faq(sentences, topics, BENEFIT_INDICATORS, |subject| {
        format!("Why should I use {subject}?")
    })
}

/// Customization, requirements and "where to find" questions.
///
/// Every question needs a subject; when no topic was found none of them
/// is produced.
pub fn general_faqs(sentences: &[String], topics: &[String]) -> Vec<Faq> {
    let Some(primary) = topics.first() else {
        return Vec::new();
    };
    let secondary = topics.get(1).unwrap_or(primary);

    let mut faqs = Vec::new();
    if let Some(sentence) = first_match(sentences, &CUSTOMIZE_CUE) {
        faqs.push(Faq::new(
            format!("Can I customize {secondary}?"),
            clean_answer(sentence),
        ));
    }
    if let Some(sentence) = first_match(sentences, &REQUIREMENT_CUE) {
        faqs.push(Faq::new(
            format!("What are the requirements for {primary}?"),
            clean_answer(sentence),
        ));
    }
    if let Some(sentence) = first_match(sentences, &LOCATION_CUE) {
        faqs.push(Faq::new(
            format!("Where can I find more information about {primary}?"),
            clean_answer(sentence),
        ));
    }
    faqs
}

/// One FAQ about the first topic, answered by the first sentences that
/// contain any of `indicators`.
fn joined_faq(
    sentences: &[String],
    topics: &[String],
    indicators: &[&str],
    question: impl Fn(&str) -> String,
) -> Vec<Faq> {
    let Some(subject) = topics.first() else {
        return Vec::new();
    };
    let matches: Vec<&str> = sentences
        .iter()
        .filter(|sentence| contains_any(sentence, indicators))
        .take(JOINED_SENTENCES)
        .map(String::as_str)
        .collect();
    if matches.is_empty() {
        return Vec::new();
    }
    vec![Faq::new(question(subject), clean_answer(&matches.join(". ")))]
}

fn first_match<'a>(sentences: &'a [String], pattern: &Regex) -> Option<&'a String> {
    sentences.iter().find(|sentence| pattern.is_match(sentence))
}

fn mentions(sentence: &str, topic: &str) -> bool {
    sentence.to_lowercase().contains(&topic.to_lowercase())
}
