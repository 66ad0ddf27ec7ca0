//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use folio_content::ChangeNotifier;
use folio_store::ContentStore;
use md5::{Digest, Md5};

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Page content store.
    pub(crate) store: Arc<dyn ContentStore>,
    /// Broadcasts a change after every successful write.
    pub(crate) notifier: ChangeNotifier,
    /// Serve the WebSocket change feed.
    pub(crate) changes_enabled: bool,
    /// Bearer token required for writes (`None` disables the check).
    pub(crate) admin_token: Option<String>,
}

impl AppState {
    /// Whether a request carrying `authorization` may write.
    pub(crate) fn may_write(&self, authorization: Option<&str>) -> bool {
        match &self.admin_token {
            None => true,
            Some(token) => authorization
                .and_then(|value| value.strip_prefix("Bearer "))
                .is_some_and(|given| tokens_match(given.trim(), token)),
        }
    }
}

/// Compare tokens without an early exit on the first differing byte.
///
/// Both sides are hashed first so the comparison length does not depend on
/// the configured token.
fn tokens_match(given: &str, expected: &str) -> bool {
    let given = Md5::digest(given.as_bytes());
    let expected = Md5::digest(expected.as_bytes());
    given
        .iter()
        .zip(expected.iter())
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use folio_store::MemoryStore;

    use super::*;

    fn state(admin_token: Option<&str>) -> AppState {
        AppState {
            store: Arc::new(MemoryStore::new()),
            notifier: ChangeNotifier::default(),
            changes_enabled: false,
            admin_token: admin_token.map(str::to_owned),
        }
    }

    #[test]
    fn test_no_token_allows_writes() {
        assert!(state(None).may_write(None));
    }

    #[test]
    fn test_token_required() {
        let state = state(Some("s3cret"));

        assert!(state.may_write(Some("Bearer s3cret")));
        assert!(!state.may_write(Some("Bearer wrong")));
        assert!(!state.may_write(Some("s3cret")));
        assert!(!state.may_write(None));
    }

    #[test]
    fn test_tokens_match_requires_exact_token() {
        assert!(tokens_match("s3cret", "s3cret"));
        assert!(!tokens_match("s3cre", "s3cret"));
        assert!(!tokens_match("s3cret-and-more", "s3cret"));
        assert!(!tokens_match("", "s3cret"));
        assert!(!tokens_match("S3CRET", "s3cret"));
    }
}
