//! Faq struct - the core output record of the generator.

use serde::{Deserialize, Serialize};

/// A generated question and its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    /// Question synthesized from a topic and a category template
    pub question: String,
    /// Cleaned sentence (or short run of sentences) answering the question
    pub answer: String,
}

impl Faq {
    /// Create a new FAQ
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Key used to detect near-duplicate questions.
    ///
    /// Lowercases the question and drops everything that is not an ASCII
    /// letter or digit, so "What is Rust?" and "what is rust" collide.
    pub fn question_key(&self) -> String {
        self.question
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_key_ignores_case_and_punctuation() {
        let a = Faq::new("What is Sled?", "A database.");
        let b = Faq::new("what is   sled", "Something else.");
        assert_eq!(a.question_key(), "whatissled");
        assert_eq!(a.question_key(), b.question_key());
    }
}
