use crate::error::{Error, Result};
use crate::tokenizer::Normalizer;
use std::collections::HashMap;

pub type DocId = u32;

/// Term → posting list plus per-document term counts.
///
/// Posting lists keep one entry per occurrence, in insertion order. A term is
/// in a document's frequency table iff the document is in that term's posting
/// list. Document frequencies are maintained at insert time.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    normalizer: Normalizer,
    postings: HashMap<String, Vec<DocId>>,
    term_frequencies: HashMap<DocId, HashMap<String, u32>>,
    df: HashMap<String, u32>,
}

impl InvertedIndex {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer, ..Self::default() }
    }

    /// Rebuilds an index from persisted posting lists and frequency tables.
    /// Document frequencies are derived from the posting lists.
    pub(crate) fn from_parts(
        normalizer: Normalizer,
        postings: HashMap<String, Vec<DocId>>,
        term_frequencies: HashMap<DocId, HashMap<String, u32>>,
    ) -> Self {
        let mut df = HashMap::with_capacity(postings.len());
        for (term, plist) in &postings {
            let mut ids = plist.clone();
            ids.sort_unstable();
            ids.dedup();
            df.insert(term.clone(), ids.len() as u32);
        }
        Self { normalizer, postings, term_frequencies, df }
    }

    pub fn normalizer(&self) -> &Normalizer { &self.normalizer }

    /// Indexes `text` under `doc_id`. Each id may be added once; a repeat is
    /// rejected and leaves the index untouched.
    pub fn add_document(&mut self, doc_id: DocId, text: &str) -> Result<()> {
        if self.term_frequencies.contains_key(&doc_id) {
            return Err(Error::InvalidArgument(format!("document {doc_id} is already indexed")));
        }
        let terms = self.normalizer.normalize(text);
        let mut counts: HashMap<String, u32> = HashMap::new();
        for term in terms {
            self.postings.entry(term.clone()).or_default().push(doc_id);
            *counts.entry(term).or_insert(0) += 1;
        }
        for term in counts.keys() {
            *self.df.entry(term.clone()).or_insert(0) += 1;
        }
        self.term_frequencies.insert(doc_id, counts);
        Ok(())
    }

    /// Distinct documents containing `term`, ascending.
    pub fn documents_for(&self, term: &str) -> Vec<DocId> {
        let mut ids = self.postings.get(term).cloned().unwrap_or_default();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Occurrences of `term` in `doc_id`. `term` is normalized first and must
    /// reduce to exactly one index term.
    pub fn term_frequency(&self, doc_id: DocId, term: &str) -> Result<u32> {
        let term = self.normalizer.single_term(term).ok_or_else(|| {
            Error::InvalidArgument(format!("expected a single term, got {term:?}"))
        })?;
        Ok(self.raw_term_frequency(doc_id, &term))
    }

    /// Occurrences of an already-normalized term in `doc_id`.
    pub fn raw_term_frequency(&self, doc_id: DocId, term: &str) -> u32 {
        self.term_frequencies
            .get(&doc_id)
            .and_then(|tf| tf.get(term))
            .copied()
            .unwrap_or(0)
    }

    pub fn document_frequency(&self, term: &str) -> u32 {
        self.df.get(term).copied().unwrap_or(0)
    }

    /// `ln(|D| / (1 + df))`. An empty index counts as one document so the
    /// result stays finite.
    pub fn inverse_document_frequency(&self, term: &str) -> f64 {
        let n = self.num_docs().max(1) as f64;
        (n / (1.0 + self.document_frequency(term) as f64)).ln()
    }

    pub fn num_docs(&self) -> u32 { self.term_frequencies.len() as u32 }

    pub fn num_terms(&self) -> usize { self.postings.len() }

    pub fn contains_document(&self, doc_id: DocId) -> bool {
        self.term_frequencies.contains_key(&doc_id)
    }

    pub(crate) fn postings(&self) -> &HashMap<String, Vec<DocId>> { &self.postings }

    pub(crate) fn term_frequencies(&self) -> &HashMap<DocId, HashMap<String, u32>> {
        &self.term_frequencies
    }

    /// Checks that posting lists and frequency tables describe the same
    /// occurrences. Used to reject inconsistent cache artifacts.
    pub(crate) fn check_consistency(&self) -> std::result::Result<(), String> {
        let mut seen: HashMap<(DocId, &str), u32> = HashMap::new();
        for (term, plist) in &self.postings {
            for &doc_id in plist {
                *seen.entry((doc_id, term.as_str())).or_insert(0) += 1;
            }
        }
        let mut expected = 0usize;
        for (&doc_id, tf) in &self.term_frequencies {
            for (term, &count) in tf {
                expected += 1;
                match seen.get(&(doc_id, term.as_str())) {
                    Some(&n) if n == count => {}
                    Some(&n) => {
                        return Err(format!("term {term:?} in document {doc_id}: {n} postings, frequency {count}"))
                    }
                    None => return Err(format!("term {term:?} in document {doc_id} has no postings")),
                }
            }
        }
        if expected != seen.len() {
            return Err(format!("{} posting pairs have no frequency entry", seen.len() - expected));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> InvertedIndex {
        let mut idx = InvertedIndex::new(Normalizer::new(["a", "the"]));
        idx.add_document(1, "The Matrix A hacker discovers reality").unwrap();
        idx.add_document(2, "Matrix Reloaded Sequel").unwrap();
        idx
    }

    #[test]
    fn postings_keep_every_occurrence() {
        let mut idx = InvertedIndex::new(Normalizer::default());
        idx.add_document(7, "hello hello hello world").unwrap();
        assert_eq!(idx.postings()["hello"], vec![7, 7, 7]);
        assert_eq!(idx.documents_for("hello"), vec![7]);
        assert_eq!(idx.raw_term_frequency(7, "hello"), 3);
        assert_eq!(idx.document_frequency("hello"), 1);
    }

    #[test]
    fn documents_for_is_sorted_and_distinct() {
        let mut idx = InvertedIndex::new(Normalizer::default());
        idx.add_document(9, "rust rust").unwrap();
        idx.add_document(3, "rust").unwrap();
        assert_eq!(idx.documents_for("rust"), vec![3, 9]);
        assert!(idx.documents_for("python").is_empty());
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut idx = index();
        let err = idx.add_document(1, "matrix matrix").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(idx.raw_term_frequency(1, "matrix"), 1);
        assert_eq!(idx.document_frequency("matrix"), 2);
        assert_eq!(idx.num_docs(), 2);
    }

    #[test]
    fn term_frequency_normalizes_its_argument() {
        let idx = index();
        assert_eq!(idx.term_frequency(1, "Hacker").unwrap(), 1);
        assert_eq!(idx.term_frequency(1, "hackers").unwrap(), 1);
        assert_eq!(idx.term_frequency(2, "hacker").unwrap(), 0);
        assert_eq!(idx.term_frequency(42, "hacker").unwrap(), 0);
        assert!(matches!(idx.term_frequency(1, "hacker discovers"), Err(Error::InvalidArgument(_))));
        assert!(matches!(idx.term_frequency(1, ""), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn idf_is_finite_for_unknown_terms() {
        let idx = index();
        assert!((idx.inverse_document_frequency("nope") - 2f64.ln()).abs() < 1e-12);
        assert!(InvertedIndex::default().inverse_document_frequency("nope").is_finite());
    }

    #[test]
    fn document_without_terms_still_counts() {
        let mut idx = InvertedIndex::new(Normalizer::new(["the"]));
        idx.add_document(0, "the").unwrap();
        assert_eq!(idx.num_docs(), 1);
        assert_eq!(idx.num_terms(), 0);
        assert!(idx.contains_document(0));
    }

    #[test]
    fn built_index_is_consistent() {
        assert!(index().check_consistency().is_ok());
        let mut postings = HashMap::new();
        postings.insert("ghost".to_string(), vec![1]);
        let broken = InvertedIndex::from_parts(Normalizer::default(), postings, HashMap::new());
        assert!(broken.check_consistency().is_err());
    }
}
