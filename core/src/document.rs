use crate::error::{Error, Result};
use std::collections::HashMap;

/// A document reduced to a bag of normalized tokens.
///
/// `max_occurrence` is the largest count in `word_counts` and serves as the
/// tf normalizer, so every recorded term has `0 < tf <= 1`.
#[derive(Debug, Clone)]
pub struct DocumentModel {
    doc_id: String,
    word_counts: HashMap<String, u32>,
    max_occurrence: u32,
}

impl DocumentModel {
    /// Count the tokens of one document. Empty tokens are discarded; a
    /// document left with nothing to count is rejected.
    pub fn from_tokens<I, S>(doc_id: impl Into<String>, tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let doc_id = doc_id.into();
        let mut word_counts: HashMap<String, u32> = HashMap::new();
        for token in tokens {
            let token = token.as_ref();
            if token.is_empty() {
                continue;
            }
            *word_counts.entry(token.to_string()).or_insert(0) += 1;
        }
        let max_occurrence = match word_counts.values().max() {
            Some(&m) => m,
            None => return Err(Error::EmptyDocument { doc_id }),
        };
        Ok(Self { doc_id, word_counts, max_occurrence })
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn max_occurrence(&self) -> u32 {
        self.max_occurrence
    }

    /// Raw occurrence count; 0 for terms not in the document.
    pub fn word_count(&self, term: &str) -> u32 {
        self.word_counts.get(term).copied().unwrap_or(0)
    }

    pub fn tf(&self, term: &str) -> f64 {
        self.word_count(term) as f64 / self.max_occurrence as f64
    }

    /// Distinct terms in lexicographic order.
    pub fn vocabulary(&self) -> Vec<&str> {
        let mut terms: Vec<&str> = self.word_counts.keys().map(String::as_str).collect();
        terms.sort_unstable();
        terms
    }

    pub fn word_counts(&self) -> impl Iterator<Item = (&str, u32)> {
        self.word_counts.iter().map(|(t, c)| (t.as_str(), *c))
    }
}
