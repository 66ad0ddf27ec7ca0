//! Publish controller.
//!
//! Drives an [`EditorSession`] through extraction, merge, persist and change
//! notification.

use std::time::{Duration, Instant};

use folio_store::{FetchedPage, Precondition, Sections};

use super::session::{
    DEFAULT_STATUS_DISPLAY, EditorSession, PublishState, StatusIndicator, StatusKind,
};
use crate::backend::{BackendError, ContentBackend};
use crate::extract::{EditSurface, FieldExtractor};
use crate::merge::{MergeWarning, merge_with_diagnostics};
use crate::notify::ChangeNotifier;

/// Publish failure.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Someone else published the page after this session loaded it.
    #[error("page '{page}' was published by someone else; reload before publishing")]
    Conflict {
        /// Page name.
        page: String,
    },

    /// The backend could not be read or written.
    #[error("publish failed: {0}")]
    Backend(#[source] BackendError),

    /// The session is editing a different page.
    #[error("page '{page}' is not loaded in this session")]
    NoPageLoaded {
        /// Requested page name.
        page: String,
    },
}

impl From<BackendError> for PublishError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Conflict { page } => Self::Conflict { page },
            other => Self::Backend(other),
        }
    }
}

/// Result of a successful publish.
#[derive(Debug)]
pub struct PublishOutcome {
    /// The persisted page, now the session's base.
    pub page: FetchedPage,
    /// Type changes resolved while merging.
    pub warnings: Vec<MergeWarning>,
    /// Number of change subscribers notified.
    pub notified: usize,
}

/// Orchestrates draft saves and publishes against a [`ContentBackend`].
pub struct PublishController<B> {
    backend: B,
    extractor: FieldExtractor,
    notifier: ChangeNotifier,
    status_display: Duration,
    concurrency_check: bool,
}

impl<B: ContentBackend> PublishController<B> {
    /// Create a controller with default extraction rules and its own notifier.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            extractor: FieldExtractor::default(),
            notifier: ChangeNotifier::default(),
            status_display: DEFAULT_STATUS_DISPLAY,
            concurrency_check: true,
        }
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: FieldExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Emit change events on `notifier` (shared with other components).
    #[must_use]
    pub fn with_notifier(mut self, notifier: ChangeNotifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// How long status indicators stay visible.
    #[must_use]
    pub fn with_status_display(mut self, display: Duration) -> Self {
        self.status_display = display;
        self
    }

    /// When disabled, publishes overwrite whatever is stored (last writer wins).
    #[must_use]
    pub fn with_concurrency_check(mut self, enabled: bool) -> Self {
        self.concurrency_check = enabled;
        self
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Load a page into a new session.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Backend`] if the page cannot be fetched.
    pub fn load_page_content(&self, page_name: &str) -> Result<EditorSession, PublishError> {
        let base = self.backend.fetch(page_name)?;
        let session = EditorSession::new(base);
        tracing::debug!(
            page = %page_name,
            session = %session.id(),
            persisted = session.base().revision.is_some(),
            "Loaded page content"
        );
        Ok(session)
    }

    /// Fold the current surface into the session's working content.
    ///
    /// Local checkpoint only; the backend is never called.
    pub fn save_draft(
        &self,
        session: &mut EditorSession,
        surface: &EditSurface,
    ) -> Vec<MergeWarning> {
        let draft = self
            .extractor
            .extract(session.page_name(), surface, session.working());

        let mut warnings = Vec::new();
        let working = merge_with_diagnostics(session.working(), &draft, &mut warnings);
        session.set_working(working);

        log_warnings(session, &warnings);
        tracing::debug!(
            page = %session.page_name(),
            session = %session.id(),
            sections = draft.len(),
            "Draft saved"
        );
        warnings
    }

    /// Publish the surface.
    ///
    /// Commits the pending edit, extracts the draft, merges it into the
    /// session's base document and persists the result with
    /// `published = true`. On success the session is rebased on the persisted
    /// document and a change event is emitted. On failure the working content
    /// keeps the draft and the base is left unchanged; nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Conflict`] if the page was published by someone
    /// else since the session loaded it, [`PublishError::Backend`] if the write
    /// fails, and [`PublishError::NoPageLoaded`] if `page_name` is not the
    /// session's page.
    pub fn publish(
        &self,
        session: &mut EditorSession,
        page_name: &str,
        surface: &EditSurface,
    ) -> Result<PublishOutcome, PublishError> {
        if session.page_name() != page_name {
            return Err(PublishError::NoPageLoaded {
                page: page_name.to_owned(),
            });
        }
        let start = Instant::now();

        transition(session, PublishState::Capturing);
        let mut surface = surface.clone();
        if let Some(edit) = session.take_pending_edit() {
            surface.set_field(&edit.section_id, &edit.field_id, edit.value);
        }
        let draft = self
            .extractor
            .extract(session.page_name(), &surface, session.working());

        transition(session, PublishState::Merging);
        let mut warnings = Vec::new();
        let merged =
            merge_with_diagnostics(&session.base().document.sections, &draft, &mut warnings);
        log_warnings(session, &warnings);

        transition(session, PublishState::Persisting);
        let precondition = if self.concurrency_check {
            session.base().precondition()
        } else {
            Precondition::Any
        };
        let result = self
            .backend
            .persist(page_name, merged, true, &precondition);

        match result {
            Ok(page) => {
                transition(session, PublishState::Published);
                session.rebase(page.clone());
                session.status = Some(StatusIndicator::new(StatusKind::Success, "Published"));
                let notified = self.notifier.emit(page_name);
                transition(session, PublishState::Idle);

                tracing::info!(
                    page = %page_name,
                    session = %session.id(),
                    elapsed_ms = start.elapsed().as_millis(),
                    "Page published"
                );
                Ok(PublishOutcome {
                    page,
                    warnings,
                    notified,
                })
            }
            Err(err) => {
                transition(session, PublishState::Failed);
                let working = fold_draft(session.working(), &draft);
                session.set_working(working);

                let err = PublishError::from(err);
                let kind = match err {
                    PublishError::Conflict { .. } => StatusKind::Conflict,
                    _ => StatusKind::Error,
                };
                session.status = Some(StatusIndicator::new(kind, err.to_string()));
                transition(session, PublishState::Idle);

                tracing::warn!(
                    page = %page_name,
                    session = %session.id(),
                    error = %err,
                    "Publish failed"
                );
                Err(err)
            }
        }
    }

    /// Status indicator of the session, if still visible at `now`.
    #[must_use]
    pub fn visible_status<'a>(
        &self,
        session: &'a EditorSession,
        now: Instant,
    ) -> Option<&'a StatusIndicator> {
        session
            .status()
            .filter(|status| status.is_visible_at(now, self.status_display))
    }
}

fn transition(session: &mut EditorSession, to: PublishState) {
    tracing::trace!(session = %session.id(), from = ?session.state, to = ?to, "Publish state");
    session.state = to;
}

fn fold_draft(working: &Sections, draft: &Sections) -> Sections {
    merge_with_diagnostics(working, draft, &mut Vec::new())
}

fn log_warnings(session: &EditorSession, warnings: &[MergeWarning]) {
    for warning in warnings {
        tracing::warn!(page = %session.page_name(), session = %session.id(), "{warning}");
    }
}
