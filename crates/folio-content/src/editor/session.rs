//! Editor session state.

use std::time::{Duration, Instant};

use uuid::Uuid;

use folio_store::{FetchedPage, Sections};

use crate::extract::FieldValue;

/// Default time a status indicator stays visible.
pub const DEFAULT_STATUS_DISPLAY: Duration = Duration::from_secs(3);

/// Publish pipeline state.
///
/// `Idle → Capturing → Merging → Persisting → Published | Failed → Idle`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PublishState {
    /// Nothing in flight.
    #[default]
    Idle,
    /// Flushing the pending edit and extracting the draft.
    Capturing,
    /// Merging the draft into the base document.
    Merging,
    /// Writing the merged document.
    Persisting,
    /// The write succeeded.
    Published,
    /// The write failed.
    Failed,
}

/// Kind of status indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    /// Published.
    Success,
    /// Publish failed.
    Error,
    /// Publish rejected because someone else published first.
    Conflict,
}

/// Transient outcome message shown after a publish.
#[derive(Clone, Debug)]
pub struct StatusIndicator {
    /// Outcome kind.
    pub kind: StatusKind,
    /// Human-readable message.
    pub message: String,
    /// When the indicator was raised.
    pub shown_at: Instant,
}

impl StatusIndicator {
    pub(crate) fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    /// Whether the indicator is still visible at `now`.
    #[must_use]
    pub fn is_visible_at(&self, now: Instant, display: Duration) -> bool {
        now.saturating_duration_since(self.shown_at) < display
    }
}

/// An edit the operator has started but not committed yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingEdit {
    /// Raw section identifier.
    pub section_id: String,
    /// Raw field identifier.
    pub field_id: String,
    /// Value typed so far.
    pub value: FieldValue,
}

/// Editing state for one page.
///
/// Holds the document the session was loaded from (the merge base), the
/// working content shown to the operator, and the outcome of the last publish.
/// The content store stays the only durable state.
#[derive(Clone, Debug)]
pub struct EditorSession {
    id: Uuid,
    page_name: String,
    base: FetchedPage,
    working: Sections,
    pending_edit: Option<PendingEdit>,
    pub(crate) state: PublishState,
    pub(crate) status: Option<StatusIndicator>,
}

impl EditorSession {
    /// Start a session on a fetched page.
    #[must_use]
    pub fn new(base: FetchedPage) -> Self {
        Self {
            id: Uuid::new_v4(),
            page_name: base.document.page_name.clone(),
            working: base.document.sections.clone(),
            base,
            pending_edit: None,
            state: PublishState::Idle,
            status: None,
        }
    }

    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn page_name(&self) -> &str {
        &self.page_name
    }

    /// Last known stored document.
    #[must_use]
    pub fn base(&self) -> &FetchedPage {
        &self.base
    }

    /// Working content, including unpublished drafts.
    #[must_use]
    pub fn working(&self) -> &Sections {
        &self.working
    }

    /// Mutable working content, for controls that edit nested objects and
    /// lists directly (e.g. an FAQ list editor).
    pub fn working_mut(&mut self) -> &mut Sections {
        &mut self.working
    }

    #[must_use]
    pub fn state(&self) -> PublishState {
        self.state
    }

    /// Last status indicator, visible or not.
    #[must_use]
    pub fn status(&self) -> Option<&StatusIndicator> {
        self.status.as_ref()
    }

    #[must_use]
    pub fn pending_edit(&self) -> Option<&PendingEdit> {
        self.pending_edit.as_ref()
    }

    /// Record an in-progress edit. It is committed by the next publish.
    pub fn begin_edit(&mut self, section_id: &str, field_id: &str, value: FieldValue) {
        self.pending_edit = Some(PendingEdit {
            section_id: section_id.to_owned(),
            field_id: field_id.to_owned(),
            value,
        });
    }

    pub(crate) fn take_pending_edit(&mut self) -> Option<PendingEdit> {
        self.pending_edit.take()
    }

    pub(crate) fn set_working(&mut self, working: Sections) {
        self.working = working;
    }

    /// Replace the base after a successful publish.
    pub(crate) fn rebase(&mut self, base: FetchedPage) {
        self.working = base.document.sections.clone();
        self.base = base;
    }
}
