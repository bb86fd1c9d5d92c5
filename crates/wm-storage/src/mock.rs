//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use crate::storage::{Document, Storage, StorageError, StorageErrorKind};

/// Mock storage for testing.
///
/// Holds documents in memory. Use the builder methods to configure the
/// mock with test data.
///
/// # Example
///
/// ```ignore
/// use wm_storage::{Document, MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_document("intro/start", "Start")
///     .with(Document::new("intro/next", "Next").with_order(1));
///
/// let docs = storage.scan().unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    documents: Vec<Document>,
    fail_with: Option<StorageErrorKind>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document with the given slug and title.
    #[must_use]
    pub fn with_document(self, path: impl Into<String>, title: impl Into<String>) -> Self {
        self.with(Document::new(path, title))
    }

    /// Add a fully specified document.
    #[must_use]
    pub fn with(mut self, document: Document) -> Self {
        self.documents.push(document);
        self
    }

    /// Make every scan fail with the given error kind.
    #[must_use]
    pub fn failing(mut self, kind: StorageErrorKind) -> Self {
        self.fail_with = Some(kind);
        self
    }
}

impl Storage for MockStorage {
    fn scan(&self) -> Result<Vec<Document>, StorageError> {
        if let Some(kind) = self.fail_with {
            return Err(StorageError::new(kind).with_backend("Mock"));
        }

        let mut documents = self.documents.clone();
        documents.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_scan_returns_sorted_documents() {
        let storage = MockStorage::new()
            .with_document("b", "B")
            .with_document("a", "A")
            .with(Document::new("a/z", "Z").with_order(1));

        let paths: Vec<String> = storage.scan().unwrap().into_iter().map(|d| d.path).collect();

        assert_eq!(paths, vec!["a", "a/z", "b"]);
    }

    #[test]
    fn test_scan_empty() {
        assert!(MockStorage::new().scan().unwrap().is_empty());
    }

    #[test]
    fn test_failing_scan() {
        let err = MockStorage::new()
            .with_document("a", "A")
            .failing(StorageErrorKind::NotFound)
            .scan()
            .unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.to_string(), "[Mock] Not found");
    }
}
