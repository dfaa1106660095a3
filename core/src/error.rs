use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while building, persisting or loading an index.
///
/// Query-time outcomes such as "no known term" are not errors; see
/// [`crate::QueryResult`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("document {doc_id:?} has no indexable tokens")]
    EmptyDocument { doc_id: String },

    #[error("duplicate document id {0:?} in collection")]
    DuplicateDocumentId(String),

    #[error("cannot build an index over an empty collection")]
    EmptyCollection,

    #[error("index file not found: {}", path.display())]
    MissingIndexFile { path: PathBuf },

    #[error("malformed index file {} at line {line}: {reason}", path.display())]
    MalformedIndex {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("malformed collection {}: {reason}", path.display())]
    MalformedCollection { path: PathBuf, reason: String },

    #[error("i/o error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}
