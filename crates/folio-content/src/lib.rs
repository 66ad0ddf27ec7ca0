//! Page content capture, merge and publish pipeline.
//!
//! ```text
//! EditSurface -> FieldExtractor -> PathNormalizer -> SectionRouter -> draft
//!     draft + stored document -> merge -> ContentBackend::persist -> ChangeNotifier
//! ```
//!
//! The [`PublishController`] runs the pipeline for an [`EditorSession`].
//! [`PublishController::save_draft`] stops after merging into the session's
//! working content; only [`PublishController::publish`] writes to the backend.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use folio_content::{EditSurface, LocalBackend, PublishController};
//! use folio_store::{ContentStore, MemoryStore};
//!
//! let store = Arc::new(MemoryStore::new());
//! let shared = Arc::clone(&store);
//! let controller = PublishController::new(LocalBackend::new(shared));
//!
//! let mut session = controller.load_page_content("about").unwrap();
//! let surface = EditSurface::new().with_text("about-hero", "about-hero-title", "Hello");
//! controller.publish(&mut session, "about", &surface).unwrap();
//!
//! let stored = store.get("about").unwrap().unwrap();
//! assert_eq!(stored.sections["hero"]["title"], "Hello");
//! ```

pub mod backend;
pub mod editor;
pub mod extract;
pub mod merge;
pub mod normalize;
pub mod notify;
pub mod routing;

pub use backend::{BackendError, ContentBackend, HttpBackend, LocalBackend};
pub use editor::{
    EditorSession, PublishController, PublishError, PublishOutcome, PublishState,
    StatusIndicator, StatusKind,
};
pub use extract::{EditSurface, FieldExtractor, FieldValue};
pub use merge::{MergeWarning, merge, merge_with_diagnostics};
pub use normalize::PathNormalizer;
pub use notify::{ChangeNotifier, ContentChanged, Subscription};
pub use routing::{KeyAlias, SectionRouter};
