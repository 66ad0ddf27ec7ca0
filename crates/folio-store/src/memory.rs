//! In-memory store implementation.
//!
//! Provides [`MemoryStore`] for tests and servers that do not need durability.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;

use crate::document::{PageContentDocument, Precondition, Sections, upsert, validate_page_name};
use crate::store::{ContentStore, StoreError};

/// Backend identifier for error messages.
const BACKEND: &str = "Memory";

/// In-memory content store.
///
/// Documents live in a map guarded by a [`RwLock`]. The write lock is held
/// across the precondition check and the insert, so conditional writes are
/// atomic.
///
/// # Example
///
/// ```
/// use folio_store::{ContentStore, MemoryStore, Precondition, Sections};
///
/// let store = MemoryStore::new();
/// store.put("home", Sections::new(), true, &Precondition::Any).unwrap();
/// assert_eq!(store.list().unwrap(), vec!["home".to_owned()]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<BTreeMap<String, PageContentDocument>>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a document.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_document(self, document: PageContentDocument) -> Self {
        self.documents
            .write()
            .unwrap()
            .insert(document.page_name.clone(), document);
        self
    }
}

impl ContentStore for MemoryStore {
    fn get(&self, page_name: &str) -> Result<Option<PageContentDocument>, StoreError> {
        validate_page_name(page_name).map_err(|e| e.with_backend(BACKEND))?;
        Ok(self.documents.read().unwrap().get(page_name).cloned())
    }

    fn put(
        &self,
        page_name: &str,
        sections: Sections,
        published: bool,
        precondition: &Precondition,
    ) -> Result<PageContentDocument, StoreError> {
        validate_page_name(page_name).map_err(|e| e.with_backend(BACKEND))?;

        let mut documents = self.documents.write().unwrap();
        let document = upsert(
            documents.get(page_name),
            page_name,
            sections,
            published,
            precondition,
            Utc::now(),
        )
        .map_err(|e| e.with_backend(BACKEND))?;

        documents.insert(page_name.to_owned(), document.clone());
        Ok(document)
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.documents.read().unwrap().keys().cloned().collect())
    }
}
