use crate::document::Document;
use std::collections::HashMap;

/// In-memory collection of indexed documents keyed by document id
#[derive(Debug, Default)]
pub struct DocumentIndex {
    documents: HashMap<String, Document>,
}

impl DocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `text` under `doc_id`, replacing any previous version wholesale
    pub fn index_document(&mut self, doc_id: &str, path: &str, text: &str) {
        let document = Document::build(doc_id, path, text);
        log::debug!(
            "Indexed {doc_id} ({path}): {} paragraphs, {} sentences, {} chunks",
            document.paragraphs().len(),
            document.sentence_count(),
            document.chunks().len()
        );
        if self.documents.insert(doc_id.to_string(), document).is_some() {
            log::debug!("Replaced previous index for {doc_id}");
        }
    }

    pub fn remove_document(&mut self, doc_id: &str) -> bool {
        self.documents.remove(doc_id).is_some()
    }

    pub fn contains(&self, doc_id: &str) -> bool {
        self.documents.contains_key(doc_id)
    }

    pub fn get(&self, doc_id: &str) -> Option<&Document> {
        self.documents.get(doc_id)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }

    /// Documents in a stable order (by id)
    pub fn documents(&self) -> Vec<&Document> {
        let mut docs: Vec<&Document> = self.documents.values().collect();
        docs.sort_by(|a, b| a.doc_id().cmp(b.doc_id()));
        docs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reindex_replaces_document() {
        let mut index = DocumentIndex::new();
        index.index_document("a", "a.md", "old text");
        index.index_document("a", "a.md", "new text");
        assert_eq!(index.document_count(), 1);
        assert_eq!(index.get("a").map(Document::raw_text), Some("new text"));
    }

    #[test]
    fn remove_and_clear() {
        let mut index = DocumentIndex::new();
        index.index_document("a", "a.md", "x");
        index.index_document("b", "b.md", "y");
        assert!(index.remove_document("a"));
        assert!(!index.remove_document("a"));
        assert!(index.contains("b"));
        index.clear();
        assert!(index.is_empty());
    }
}
