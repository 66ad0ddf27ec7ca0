//! Store trait and error types.
//!
//! Provides the core [`ContentStore`] trait for reading and writing page content
//! documents, along with [`StoreError`] for unified error handling across backends.

use chrono::Utc;

use crate::document::{FetchedPage, PageContentDocument, Precondition, Sections};

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Page does not exist.
    NotFound,
    /// Page name is not acceptable as a key.
    InvalidPageName,
    /// A write precondition failed (someone else published first).
    Conflict,
    /// Stored data could not be decoded.
    Corrupt,
    /// Permission denied.
    PermissionDenied,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Other/unknown error category.
    Other,
}

/// Store error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StoreError {
    /// Semantic error category.
    pub kind: StoreErrorKind,
    /// Page context (if applicable).
    pub page: Option<String>,
    /// Backend identifier (e.g., "Fs", "Memory").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            page: None,
            backend: None,
            source: None,
        }
    }

    /// Attach page context.
    #[must_use]
    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Whether this error is a failed write precondition.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.kind == StoreErrorKind::Conflict
    }

    /// Create a store error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, page: Option<&str>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StoreErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StoreErrorKind::PermissionDenied,
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                StoreErrorKind::Unavailable
            }
            _ => StoreErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = page {
            error = error.with_page(p);
        }
        error
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (page: name)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StoreErrorKind::NotFound => "Not found",
            StoreErrorKind::InvalidPageName => "Invalid page name",
            StoreErrorKind::Conflict => "Conflict",
            StoreErrorKind::Corrupt => "Corrupt document",
            StoreErrorKind::PermissionDenied => "Permission denied",
            StoreErrorKind::Unavailable => "Unavailable",
            StoreErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(page) = &self.page {
            write!(f, " (page: {page})")?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Persistent home of page content documents, one per page name.
///
/// Implementations validate page names with
/// [`validate_page_name`](crate::validate_page_name) before touching storage.
pub trait ContentStore: Send + Sync {
    /// Read the persisted document for a page.
    ///
    /// Returns `Ok(None)` when the page was never written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the name is invalid or the backend fails.
    fn get(&self, page_name: &str) -> Result<Option<PageContentDocument>, StoreError>;

    /// Insert or replace the document for a page.
    ///
    /// Sets `updated_at` to now and keeps the original `created_at`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with [`StoreErrorKind::Conflict`] if `precondition`
    /// does not hold, or another kind if the backend fails.
    fn put(
        &self,
        page_name: &str,
        sections: Sections,
        published: bool,
        precondition: &Precondition,
    ) -> Result<PageContentDocument, StoreError>;

    /// List persisted page names in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be enumerated.
    fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Read the persisted document, or synthesize one from the default template.
    ///
    /// The synthesized document is not persisted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the name is invalid or the backend fails.
    fn fetch_or_default(&self, page_name: &str) -> Result<FetchedPage, StoreError> {
        Ok(match self.get(page_name)? {
            Some(document) => FetchedPage::persisted(document),
            None => {
                tracing::debug!(page = %page_name, "Synthesizing page from default template");
                FetchedPage::synthesized(PageContentDocument::from_template(page_name, Utc::now()))
            }
        })
    }
}
