use crate::collection::build_collection_index;
use crate::document::DocumentModel;
use crate::error::Result;
use crate::index::{BuiltIndex, IdfTable, TfTable};
use crate::persist::{index_exists, load_index, save_index, IndexPaths};
use crate::tokenizer::tokenize;
use crate::vector::{cosine, SparseVector};
use serde::Serialize;
use std::cmp::Ordering;

pub const DEFAULT_TOP_K: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDocument {
    pub doc_id: String,
    pub score: f64,
}

/// Outcome of a query. None of these are errors.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// No query term is in the indexed vocabulary.
    OutOfVocabulary,
    /// Terms are known but no document scored above 0.
    NoResults,
    /// Best matches, score descending.
    Ranked(Vec<ScoredDocument>),
}

impl QueryResult {
    pub fn hits(&self) -> &[ScoredDocument] {
        match self {
            QueryResult::Ranked(hits) => hits,
            _ => &[],
        }
    }
}

/// Keeps the best `cap` hits seen so far. On an exact tie with the current
/// minimum the incumbent stays.
struct TopK {
    cap: usize,
    hits: Vec<ScoredDocument>,
}

impl TopK {
    fn new(cap: usize) -> Self {
        Self { cap, hits: Vec::with_capacity(cap) }
    }

    fn offer(&mut self, doc_id: &str, score: f64) {
        if self.hits.len() < self.cap {
            self.hits.push(ScoredDocument { doc_id: doc_id.to_string(), score });
        } else {
            match self.hits.last_mut() {
                Some(min) if score > min.score => {
                    *min = ScoredDocument { doc_id: doc_id.to_string(), score };
                }
                _ => return,
            }
        }
        // stable: equal scores keep scan order
        self.hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    }

    fn into_vec(self) -> Vec<ScoredDocument> {
        self.hits
    }
}

/// Ranks every document of a loaded index against free-text queries.
///
/// The tables are read-only once the engine exists, so a single engine can
/// serve concurrent queries behind an `Arc`.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    tf: TfTable,
    idf: IdfTable,
    top_k: usize,
}

impl QueryEngine {
    pub fn new(tf: TfTable, idf: IdfTable) -> Self {
        Self { tf, idf, top_k: DEFAULT_TOP_K }
    }

    pub fn from_index(index: &BuiltIndex) -> Self {
        Self::new(index.tf_table(), index.idf_table())
    }

    pub fn load(paths: &IndexPaths) -> Result<Self> {
        let (tf, idf) = load_index(paths)?;
        Ok(Self::new(tf, idf))
    }

    /// Load `<base>.tf` / `<base>.idf` when both exist, otherwise build them
    /// from `<base>.xml` and write them out first.
    pub fn open_or_build(paths: &IndexPaths) -> Result<Self> {
        if index_exists(paths) {
            return Self::load(paths);
        }
        tracing::info!(collection = %paths.collection().display(), "index files missing, building");
        let index = build_collection_index(&paths.collection())?;
        save_index(paths, &index)?;
        Ok(Self::from_index(&index))
    }

    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k.max(1);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn num_documents(&self) -> usize {
        self.tf.num_documents()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    /// Normalize raw query text and rank documents against it.
    pub fn search(&self, raw_query: &str) -> QueryResult {
        let tokens = tokenize(raw_query);
        self.search_tokens(tokens.as_slice())
    }

    /// Rank documents against already-normalized query tokens.
    pub fn search_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> QueryResult {
        if !tokens.iter().any(|t| self.idf.contains(t.as_ref())) {
            return QueryResult::OutOfVocabulary;
        }
        let query_doc = match DocumentModel::from_tokens("", tokens) {
            Ok(doc) => doc,
            Err(_) => return QueryResult::OutOfVocabulary,
        };
        let q = self.query_vector(&query_doc);

        let mut top = TopK::new(self.top_k);
        let mut matched = 0usize;
        for (doc_id, terms) in self.tf.documents() {
            let d = self.document_vector(terms.iter().map(|(t, tf)| (t.as_str(), *tf)));
            let score = cosine(&d, &q);
            if score == 0.0 {
                continue;
            }
            matched += 1;
            top.offer(doc_id, score);
        }
        tracing::debug!(query_terms = q.len(), matched, "search complete");

        let hits = top.into_vec();
        if hits.is_empty() {
            QueryResult::NoResults
        } else {
            QueryResult::Ranked(hits)
        }
    }

    /// Query weights are raw counts times idf; unknown terms are left out.
    fn query_vector(&self, query: &DocumentModel) -> SparseVector {
        query
            .word_counts()
            .filter_map(|(term, count)| self.idf.idf(term).map(|idf| (term, count as f64 * idf)))
            .collect()
    }

    fn document_vector<'a>(&self, terms: impl Iterator<Item = (&'a str, f64)>) -> SparseVector {
        terms
            .filter_map(|(term, tf)| self.idf.idf(term).map(|idf| (term, tf * idf)))
            .collect()
    }
}
