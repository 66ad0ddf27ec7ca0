//! Content backends.
//!
//! A [`ContentBackend`] is what the publish controller reads from and writes
//! to: either a store in the same process ([`LocalBackend`]) or a Folio
//! server over HTTP ([`HttpBackend`]).

mod http;
mod local;

pub use http::HttpBackend;
pub use local::LocalBackend;

use folio_store::{FetchedPage, Precondition, Sections, StoreError};

/// Error from a content backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The page was published by someone else since it was fetched.
    #[error("page '{page}' was changed by someone else")]
    Conflict {
        /// Page name.
        page: String,
    },

    /// Local store failure.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// Server answered with an error status.
    #[error("HTTP error: {status} - {message}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },
}

impl BackendError {
    /// Whether the error is a failed write precondition.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Source and destination of page content documents.
pub trait ContentBackend: Send + Sync {
    /// Fetch the stored document, or the default template if none exists.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the backend cannot be read.
    fn fetch(&self, page_name: &str) -> Result<FetchedPage, BackendError>;

    /// Persist a document.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Conflict`] if `precondition` does not hold, or
    /// another variant if the write fails.
    fn persist(
        &self,
        page_name: &str,
        sections: Sections,
        published: bool,
        precondition: &Precondition,
    ) -> Result<FetchedPage, BackendError>;
}

impl<B: ContentBackend + ?Sized> ContentBackend for Box<B> {
    fn fetch(&self, page_name: &str) -> Result<FetchedPage, BackendError> {
        (**self).fetch(page_name)
    }

    fn persist(
        &self,
        page_name: &str,
        sections: Sections,
        published: bool,
        precondition: &Precondition,
    ) -> Result<FetchedPage, BackendError> {
        (**self).persist(page_name, sections, published, precondition)
    }
}
