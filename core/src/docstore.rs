use crate::index::DocId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A movie record as it appears in the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub description: String,
}

impl Document {
    /// Text that gets indexed for this document.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// Document id → original record, for hydrating results.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DocumentStore {
    docs: HashMap<DocId, Document>,
}

impl DocumentStore {
    pub fn new() -> Self { Self::default() }

    pub fn put(&mut self, doc_id: DocId, record: Document) {
        self.docs.insert(doc_id, record);
    }

    pub fn get(&self, doc_id: DocId) -> Option<&Document> {
        self.docs.get(&doc_id)
    }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&DocId, &Document)> {
        self.docs.iter()
    }
}

impl FromIterator<Document> for DocumentStore {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self { docs: iter.into_iter().map(|d| (d.id, d)).collect() }
    }
}
