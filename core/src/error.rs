//! Error types for the retrieval core.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The document source is missing or does not hold a movie corpus.
    #[error("corpus unreadable at {}: {reason}", path.display())]
    CorpusUnreadable { path: PathBuf, reason: String },

    /// A cache artifact is missing, corrupt, or from an unsupported schema.
    #[error("cache unavailable at {}: {reason}", path.display())]
    CacheUnavailable { path: PathBuf, reason: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure while writing the cache.
    #[error("encode error: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn corpus(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::CorpusUnreadable { path: path.into(), reason: reason.to_string() }
    }

    pub(crate) fn cache(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::CacheUnavailable { path: path.into(), reason: reason.to_string() }
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Encode(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Encode(err.to_string())
    }
}
