//! Keyword retrieval over a movie corpus: text normalization, an inverted
//! index with per-document term counts, TF-IDF ranking and an on-disk cache.

pub mod docstore;
pub mod error;
pub mod index;
pub mod persist;
pub mod search;
pub mod source;
pub mod tokenizer;

pub use docstore::{Document, DocumentStore};
pub use error::{Error, Result};
pub use index::{DocId, InvertedIndex};
pub use search::{SearchEngine, SearchHit};
pub use tokenizer::Normalizer;
