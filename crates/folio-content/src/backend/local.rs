//! In-process backend.

use std::sync::Arc;

use folio_store::{ContentStore, FetchedPage, Precondition, Sections};

use super::{BackendError, ContentBackend};

/// Backend that talks to a [`ContentStore`] in the same process.
#[derive(Clone)]
pub struct LocalBackend {
    store: Arc<dyn ContentStore>,
}

impl LocalBackend {
    /// Wrap a store.
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }
}

impl ContentBackend for LocalBackend {
    fn fetch(&self, page_name: &str) -> Result<FetchedPage, BackendError> {
        Ok(self.store.fetch_or_default(page_name)?)
    }

    fn persist(
        &self,
        page_name: &str,
        sections: Sections,
        published: bool,
        precondition: &Precondition,
    ) -> Result<FetchedPage, BackendError> {
        match self.store.put(page_name, sections, published, precondition) {
            Ok(document) => Ok(FetchedPage::persisted(document)),
            Err(e) if e.is_conflict() => Err(BackendError::Conflict {
                page: page_name.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}
