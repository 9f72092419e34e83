//! On-disk cache for a built index and document store.
//!
//! A cache directory holds four artifacts, all rewritten on every save:
//! `meta.json` (manifest), `index.bin` (posting lists), `term_frequencies.bin`
//! and `docmap.bin`. Binary artifacts are bincode-encoded schema structs with
//! ordered maps and a version field.

use crate::docstore::{Document, DocumentStore};
use crate::error::{Error, Result};
use crate::index::{DocId, InvertedIndex};
use crate::tokenizer::Normalizer;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaFile {
    pub version: u32,
    pub num_docs: u32,
    pub num_terms: u32,
    pub created_at: String,
    /// Stopwords of the normalizer the index was built with.
    #[serde(default)]
    pub stopwords: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct IndexFile {
    version: u32,
    num_docs: u32,
    postings: BTreeMap<String, Vec<DocId>>,
}

#[derive(Serialize, Deserialize)]
struct TermFrequencyFile {
    version: u32,
    tf: BTreeMap<DocId, BTreeMap<String, u32>>,
}

#[derive(Serialize, Deserialize)]
struct DocMapFile {
    version: u32,
    docs: BTreeMap<DocId, Document>,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn meta(&self) -> PathBuf { self.root.join("meta.json") }
    pub fn index(&self) -> PathBuf { self.root.join("index.bin") }
    pub fn term_frequencies(&self) -> PathBuf { self.root.join("term_frequencies.bin") }
    pub fn docmap(&self) -> PathBuf { self.root.join("docmap.bin") }
}

/// Writes every artifact for `index` and `docs` under `paths.root`, creating
/// the directory if needed.
pub fn save(index: &InvertedIndex, docs: &DocumentStore, paths: &IndexPaths) -> Result<()> {
    create_dir_all(&paths.root)?;

    let postings: BTreeMap<String, Vec<DocId>> =
        index.postings().iter().map(|(t, p)| (t.clone(), p.clone())).collect();
    write_bin(&paths.index(), &IndexFile { version: SCHEMA_VERSION, num_docs: index.num_docs(), postings })?;

    let tf: BTreeMap<DocId, BTreeMap<String, u32>> = index
        .term_frequencies()
        .iter()
        .map(|(&doc_id, counts)| (doc_id, counts.iter().map(|(t, &c)| (t.clone(), c)).collect()))
        .collect();
    write_bin(&paths.term_frequencies(), &TermFrequencyFile { version: SCHEMA_VERSION, tf })?;

    let docs_out: BTreeMap<DocId, Document> = docs.iter().map(|(&id, d)| (id, d.clone())).collect();
    write_bin(&paths.docmap(), &DocMapFile { version: SCHEMA_VERSION, docs: docs_out })?;

    let meta = MetaFile {
        version: SCHEMA_VERSION,
        num_docs: index.num_docs(),
        num_terms: u32::try_from(index.num_terms()).map_err(|e| Error::Encode(e.to_string()))?,
        stopwords: index.normalizer().stopwords(),
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
    };
    save_meta(paths, &meta)?;

    tracing::info!(path = %paths.root.display(), num_docs = meta.num_docs, num_terms = meta.num_terms, "cache saved");
    Ok(())
}

/// Reads a cache written by [`save`]. Any missing, undecodable or mismatched
/// artifact fails with [`Error::CacheUnavailable`].
pub fn load(paths: &IndexPaths, normalizer: Normalizer) -> Result<(InvertedIndex, DocumentStore)> {
    let meta = load_meta(paths)?;
    check_version(&paths.meta(), meta.version)?;
    if stopwords_differ(&meta, &normalizer) {
        tracing::warn!(
            path = %paths.meta().display(),
            cached = meta.stopwords.len(),
            current = normalizer.stopword_count(),
            "stopwords differ from the ones the index was built with"
        );
    }

    let index_file: IndexFile = read_bin(&paths.index())?;
    check_version(&paths.index(), index_file.version)?;
    let tf_file: TermFrequencyFile = read_bin(&paths.term_frequencies())?;
    check_version(&paths.term_frequencies(), tf_file.version)?;
    let doc_file: DocMapFile = read_bin(&paths.docmap())?;
    check_version(&paths.docmap(), doc_file.version)?;

    let postings: HashMap<String, Vec<DocId>> = index_file.postings.into_iter().collect();
    let tf: HashMap<DocId, HashMap<String, u32>> =
        tf_file.tf.into_iter().map(|(id, counts)| (id, counts.into_iter().collect())).collect();
    let index = InvertedIndex::from_parts(normalizer, postings, tf);

    if index.num_docs() != meta.num_docs || index_file.num_docs != meta.num_docs {
        return Err(Error::cache(&paths.root, format!(
            "manifest lists {} documents, index has {}",
            meta.num_docs,
            index.num_docs()
        )));
    }
    index.check_consistency().map_err(|reason| Error::cache(&paths.root, reason))?;

    if doc_file.docs.len() != index.num_docs() as usize
        || doc_file.docs.iter().any(|(id, doc)| *id != doc.id || !index.contains_document(*id))
    {
        return Err(Error::cache(paths.docmap(), "document map does not match the index"));
    }
    let docs: DocumentStore = doc_file.docs.into_values().collect();

    tracing::info!(path = %paths.root.display(), num_docs = meta.num_docs, "cache loaded");
    Ok((index, docs))
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let path = paths.meta();
    let mut f = File::open(&path).map_err(|e| Error::cache(&path, e))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf).map_err(|e| Error::cache(&path, e))?;
    serde_json::from_str(&buf).map_err(|e| Error::cache(&path, e))
}

/// Queries are only comparable with the index when both sides drop the same words.
pub fn stopwords_differ(meta: &MetaFile, normalizer: &Normalizer) -> bool {
    meta.stopwords != normalizer.stopwords()
}

fn check_version(path: &Path, version: u32) -> Result<()> {
    if version == SCHEMA_VERSION {
        Ok(())
    } else {
        Err(Error::cache(path, format!("unsupported schema version {version}")))
    }
}

fn write_bin<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut f = File::create(path)?;
    let bytes = bincode::serialize(value)?;
    f.write_all(&bytes)?;
    Ok(())
}

fn read_bin<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let mut f = File::open(path).map_err(|e| Error::cache(path, e))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf).map_err(|e| Error::cache(path, e))?;
    bincode::deserialize(&buf).map_err(|e| Error::cache(path, e))
}
