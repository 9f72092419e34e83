use crate::docstore::{Document, DocumentStore};
use crate::error::{Error, Result};
use crate::index::{DocId, InvertedIndex};
use crate::persist::{self, IndexPaths};
use crate::tokenizer::Normalizer;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
    pub title: String,
}

/// A built (or loaded) index together with the documents it points at.
/// Read-only after construction; safe to share across threads.
#[derive(Debug)]
pub struct SearchEngine {
    index: InvertedIndex,
    docs: DocumentStore,
}

impl SearchEngine {
    /// Indexes every document's title and description. A repeated id aborts
    /// the build.
    pub fn build<I>(documents: I, normalizer: Normalizer) -> Result<Self>
    where
        I: IntoIterator<Item = Document>,
    {
        let mut index = InvertedIndex::new(normalizer);
        let mut docs = DocumentStore::new();
        for doc in documents {
            index.add_document(doc.id, &doc.text())?;
            docs.put(doc.id, doc);
        }
        tracing::info!(num_docs = index.num_docs(), num_terms = index.num_terms(), "index built");
        Ok(Self { index, docs })
    }

    pub fn from_parts(index: InvertedIndex, docs: DocumentStore) -> Self {
        Self { index, docs }
    }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn documents(&self) -> &DocumentStore { &self.docs }

    pub fn save<P: AsRef<Path>>(&self, cache_dir: P) -> Result<()> {
        persist::save(&self.index, &self.docs, &IndexPaths::new(cache_dir))
    }

    pub fn load<P: AsRef<Path>>(cache_dir: P, normalizer: Normalizer) -> Result<Self> {
        let (index, docs) = persist::load(&IndexPaths::new(cache_dir), normalizer)?;
        Ok(Self::from_parts(index, docs))
    }

    /// Titles of the best `limit` matches for `query`.
    pub fn search(&self, query: &str, limit: usize) -> Vec<String> {
        self.search_scored(query, limit).into_iter().map(|hit| hit.title).collect()
    }

    /// Ranks every document sharing at least one term with `query` by
    /// Σ tf × idf over the query terms (repeated query terms count again).
    /// Higher scores first, ties by ascending id.
    pub fn search_scored(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let terms = self.index.normalizer().normalize(query);
        if limit == 0 || terms.is_empty() {
            return Vec::new();
        }

        let mut q_counts: BTreeMap<&str, u32> = BTreeMap::new();
        for term in &terms {
            *q_counts.entry(term.as_str()).or_insert(0) += 1;
        }

        let mut scores: HashMap<DocId, f64> = HashMap::new();
        for (term, q_count) in &q_counts {
            let idf = self.index.inverse_document_frequency(term);
            for doc_id in self.index.documents_for(term) {
                let tf = self.index.raw_term_frequency(doc_id, term) as f64;
                *scores.entry(doc_id).or_insert(0.0) += *q_count as f64 * tf * idf;
            }
        }
        tracing::debug!(query, terms = ?terms, candidates = scores.len(), "scored query");

        let mut ranked: Vec<(DocId, f64)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| rank_order(*a, *b));
        ranked
            .into_iter()
            .filter_map(|(doc_id, score)| {
                self.docs.get(doc_id).map(|d| SearchHit { doc_id, score, title: d.title.clone() })
            })
            .take(limit)
            .collect()
    }

    pub fn term_frequency(&self, doc_id: DocId, term: &str) -> Result<u32> {
        self.index.term_frequency(doc_id, term)
    }

    /// IDF of a raw word, which must normalize to exactly one term.
    pub fn inverse_document_frequency(&self, term: &str) -> Result<f64> {
        let term = self.single_term(term)?;
        Ok(self.index.inverse_document_frequency(&term))
    }

    pub fn tf_idf(&self, doc_id: DocId, term: &str) -> Result<f64> {
        let term = self.single_term(term)?;
        let tf = self.index.raw_term_frequency(doc_id, &term) as f64;
        Ok(tf * self.index.inverse_document_frequency(&term))
    }

    /// Legacy lookup: titles containing `query` verbatim (case-sensitive),
    /// by ascending id. No normalization or scoring.
    pub fn title_substring_search(&self, query: &str, limit: usize) -> Vec<String> {
        let mut matches: Vec<&Document> =
            self.docs.iter().map(|(_, d)| d).filter(|d| d.title.contains(query)).collect();
        matches.sort_by_key(|d| d.id);
        matches.into_iter().take(limit).map(|d| d.title.clone()).collect()
    }

    fn single_term(&self, word: &str) -> Result<String> {
        self.index
            .normalizer()
            .single_term(word)
            .ok_or_else(|| Error::InvalidArgument(format!("expected a single term, got {word:?}")))
    }
}

fn rank_order(a: (DocId, f64), b: (DocId, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}
