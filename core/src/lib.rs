//! tf/idf indexing and cosine-similarity ranking over tagged document
//! collections.

pub mod collection;
pub mod document;
pub mod error;
pub mod index;
pub mod persist;
pub mod query;
pub mod tokenizer;
pub mod vector;

pub use document::DocumentModel;
pub use error::{Error, Result};
pub use index::{BuiltIndex, IdfEntry, IdfTable, IndexBuilder, TfEntry, TfTable};
pub use persist::IndexPaths;
pub use query::{QueryEngine, QueryResult, ScoredDocument, DEFAULT_TOP_K};
pub use vector::{cosine, SparseVector};
