use crate::document::DocumentModel;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// One row of the tf table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfEntry {
    pub doc_id: String,
    pub term: String,
    pub tf: f64,
}

/// One row of the idf table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdfEntry {
    pub term: String,
    pub idf: f64,
}

/// `doc_id -> term -> tf`. Only terms occurring in a document are stored;
/// lookups of anything else yield 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TfTable {
    docs: BTreeMap<String, HashMap<String, f64>>,
}

impl TfTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, doc_id: impl Into<String>, term: impl Into<String>, tf: f64) {
        self.docs.entry(doc_id.into()).or_default().insert(term.into(), tf);
    }

    pub fn tf(&self, doc_id: &str, term: &str) -> f64 {
        self.docs
            .get(doc_id)
            .and_then(|terms| terms.get(term))
            .copied()
            .unwrap_or(0.0)
    }

    /// Documents in scan order (ascending doc_id) with their recorded terms.
    pub fn documents(&self) -> impl Iterator<Item = (&str, &HashMap<String, f64>)> {
        self.docs.iter().map(|(id, terms)| (id.as_str(), terms))
    }

    pub fn num_documents(&self) -> usize {
        self.docs.len()
    }

    pub fn num_entries(&self) -> usize {
        self.docs.values().map(HashMap::len).sum()
    }
}

impl FromIterator<TfEntry> for TfTable {
    fn from_iter<I: IntoIterator<Item = TfEntry>>(iter: I) -> Self {
        let mut table = TfTable::new();
        for e in iter {
            table.insert(e.doc_id, e.term, e.tf);
        }
        table
    }
}

/// `term -> idf` over the whole collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdfTable {
    terms: HashMap<String, f64>,
}

impl IdfTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, term: impl Into<String>, idf: f64) {
        self.terms.insert(term.into(), idf);
    }

    /// `None` when the term is outside the vocabulary.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.terms.get(term).copied()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl FromIterator<IdfEntry> for IdfTable {
    fn from_iter<I: IntoIterator<Item = IdfEntry>>(iter: I) -> Self {
        let mut table = IdfTable::new();
        for e in iter {
            table.insert(e.term, e.idf);
        }
        table
    }
}

/// Output of [`IndexBuilder::build`]: rows in deterministic write order.
#[derive(Debug, Clone)]
pub struct BuiltIndex {
    pub tf_entries: Vec<TfEntry>,
    pub idf_entries: Vec<IdfEntry>,
    pub num_docs: usize,
}

impl BuiltIndex {
    pub fn tf_table(&self) -> TfTable {
        self.tf_entries.iter().cloned().collect()
    }

    pub fn idf_table(&self) -> IdfTable {
        self.idf_entries.iter().cloned().collect()
    }
}

/// Collects documents and computes tf/idf over them.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    docs: Vec<DocumentModel>,
    seen: HashSet<String>,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one document given its already-normalized tokens.
    pub fn add_document<I, S>(&mut self, doc_id: &str, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.seen.contains(doc_id) {
            return Err(Error::DuplicateDocumentId(doc_id.to_string()));
        }
        let doc = DocumentModel::from_tokens(doc_id, tokens)?;
        self.seen.insert(doc_id.to_string());
        self.docs.push(doc);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn build(mut self) -> Result<BuiltIndex> {
        if self.docs.is_empty() {
            return Err(Error::EmptyCollection);
        }
        self.docs.sort_by(|a, b| a.doc_id().cmp(b.doc_id()));

        let mut tf_entries = Vec::new();
        let mut df: BTreeMap<&str, u32> = BTreeMap::new();
        for doc in &self.docs {
            for term in doc.vocabulary() {
                *df.entry(term).or_insert(0) += 1;
                tf_entries.push(TfEntry {
                    doc_id: doc.doc_id().to_string(),
                    term: term.to_string(),
                    tf: doc.tf(term),
                });
            }
        }

        let n = self.docs.len() as f64;
        let idf_entries: Vec<IdfEntry> = df
            .iter()
            .map(|(term, &df_t)| IdfEntry { term: term.to_string(), idf: (n / df_t as f64).ln() })
            .collect();

        tracing::info!(
            num_docs = self.docs.len(),
            num_terms = idf_entries.len(),
            num_postings = tf_entries.len(),
            "computed tf/idf"
        );
        Ok(BuiltIndex { tf_entries, idf_entries, num_docs: self.docs.len() })
    }
}
