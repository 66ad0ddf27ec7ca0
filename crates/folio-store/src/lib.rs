//! Page content storage for the Folio site editor.
//!
//! This crate provides a [`ContentStore`] trait that keeps exactly one
//! [`PageContentDocument`] per page name, plus the two backends used in practice:
//!
//! - [`MemoryStore`] keeps documents in memory (tests, throwaway servers)
//! - [`FsStore`] keeps one JSON file per page in a content directory
//!
//! Reading a page that was never written synthesizes a document from the
//! built-in default template for that page name (see [`default_sections`]).
//! The synthesized document is returned, not persisted.
//!
//! Writes accept a [`Precondition`] so callers can detect that someone else
//! published the page since they fetched it.
//!
//! # Example
//!
//! ```
//! use folio_store::{ContentStore, MemoryStore, Precondition};
//!
//! let store = MemoryStore::new();
//! let fetched = store.fetch_or_default("about").unwrap();
//! assert!(fetched.revision.is_none());
//!
//! let stored = store
//!     .put("about", fetched.document.sections, true, &Precondition::Missing)
//!     .unwrap();
//! assert!(stored.published);
//! ```

mod defaults;
mod document;
mod fs;
mod memory;
mod store;

pub use defaults::default_sections;
pub use document::{
    FetchedPage, PageContentDocument, Precondition, Revision, Sections, validate_page_name,
};
pub use fs::FsStore;
pub use memory::MemoryStore;
pub use store::{ContentStore, StoreError, StoreErrorKind};
