use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref PUNCT: Regex = Regex::new(r"[\p{P}\p{S}]").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
}

/// Normalize a single whitespace-delimited word: strip punctuation, stem.
/// Returns an empty string when nothing indexable is left.
pub fn normalize_word(word: &str) -> String {
    let lowered = word.nfkc().collect::<String>().to_lowercase();
    let stripped = PUNCT.replace_all(&lowered, "");
    if stripped.is_empty() {
        return String::new();
    }
    STEMMER.stem(&stripped).into_owned()
}

/// Tokenize text into normalized terms: NFKC, lowercase, whitespace split,
/// punctuation removal and English (Porter2) stemming. Empty tokens are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(normalize_word)
        .filter(|t| !t.is_empty())
        .collect()
}
