//! Readers for the movie corpus and the stopword list.

use crate::docstore::Document;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusFile {
    Wrapped { movies: Vec<Document> },
    Bare(Vec<Document>),
}

/// Reads `{"movies": [...]}` or a bare array of `{id, title, description}`.
/// Anything else is [`Error::CorpusUnreadable`].
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| Error::corpus(path, e))?;
    parse_corpus(BufReader::new(f)).map_err(|e| Error::corpus(path, e))
}

fn parse_corpus<R: std::io::Read>(reader: R) -> serde_json::Result<Vec<Document>> {
    let corpus: CorpusFile = serde_json::from_reader(reader)?;
    Ok(match corpus {
        CorpusFile::Wrapped { movies } => movies,
        CorpusFile::Bare(movies) => movies,
    })
}

/// One stopword per line. A missing file is an empty set, not an error.
pub fn load_stopwords<P: AsRef<Path>>(path: P) -> HashSet<String> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(text) => text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "stopword list unavailable, filtering nothing");
            HashSet::new()
        }
    }
}
