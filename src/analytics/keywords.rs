//! Whole-word keyword counting over raw document text
//!
//! Each vocabulary term is compiled into a case-insensitive regular
//! expression anchored on word boundaries, so `profit` does not match inside
//! `profitability` and `cash flow` only matches as a contiguous phrase.

use regex::{Regex, RegexBuilder};

use crate::error::{Error, Result};
use crate::models::{KeywordCount, KeywordVocabulary};

/// Counts vocabulary occurrences in text
#[derive(Debug, Clone)]
pub struct KeywordCounter {
    vocabulary: KeywordVocabulary,
    patterns: Vec<Regex>,
}

impl KeywordCounter {
    /// Compile matchers for every vocabulary term
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a term cannot be compiled into a matcher
    pub fn new(vocabulary: KeywordVocabulary) -> Result<Self> {
        let patterns = vocabulary
            .terms()
            .iter()
            .map(|term| Self::compile(term))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            vocabulary,
            patterns,
        })
    }

    /// Build the boundary-anchored matcher for one term
    ///
    /// Inner whitespace matches any run of whitespace so phrases broken
    /// across lines by the extractor are still found.
    fn compile(term: &str) -> Result<Regex> {
        let phrase = term
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");

        RegexBuilder::new(&format!(r"\b{phrase}\b"))
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::config(format!("invalid vocabulary term {term:?}: {e}")))
    }

    /// The vocabulary this counter was built from
    pub fn vocabulary(&self) -> &KeywordVocabulary {
        &self.vocabulary
    }

    /// Count occurrences of every term in `text`
    ///
    /// Always returns one entry per vocabulary term; empty text yields zeros.
    pub fn count(&self, text: &str) -> KeywordCount {
        let mut counts = KeywordCount::zeroed(&self.vocabulary);

        if text.is_empty() {
            return counts;
        }

        for (index, pattern) in self.patterns.iter().enumerate() {
            counts.set(index, pattern.find_iter(text).count() as u64);
        }

        counts
    }
}

/// Count `vocabulary` terms in `text` without keeping the compiled counter
///
/// # Errors
///
/// Returns `Error::Config` if a term cannot be compiled into a matcher
pub fn count_keywords(text: &str, vocabulary: &KeywordVocabulary) -> Result<KeywordCount> {
    Ok(KeywordCounter::new(vocabulary.clone())?.count(text))
}
