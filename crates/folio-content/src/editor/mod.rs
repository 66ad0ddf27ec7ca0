//! Editing sessions and publishing.
//!
//! An [`EditorSession`] holds the working content for one page. The
//! [`PublishController`] checkpoints drafts into it and publishes it to a
//! content backend.

mod controller;
mod session;

pub use controller::{PublishController, PublishError, PublishOutcome};
pub use session::{
    DEFAULT_STATUS_DISPLAY, EditorSession, PendingEdit, PublishState, StatusIndicator, StatusKind,
};
