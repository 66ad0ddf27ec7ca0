//! Change notification.
//!
//! A process-wide broadcast telling content consumers that a page changed and
//! should be fetched again. Consumers subscribe when they start displaying
//! content and drop their [`Subscription`] when they stop.

use serde::Serialize;
use tokio::sync::broadcast;

/// Default capacity of the notification channel.
const DEFAULT_CAPACITY: usize = 64;

/// Event sent to subscribers after a page was published.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentChanged {
    /// Event type (always "contentChanged").
    #[serde(rename = "type")]
    event_type: &'static str,
    /// Page that changed.
    pub page_name: String,
}

impl ContentChanged {
    /// Create an event for a page.
    #[must_use]
    pub fn new(page_name: impl Into<String>) -> Self {
        Self {
            event_type: "contentChanged",
            page_name: page_name.into(),
        }
    }
}

/// Broadcasts [`ContentChanged`] events.
///
/// Cloning the notifier shares the same channel.
#[derive(Clone, Debug)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<ContentChanged>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ChangeNotifier {
    /// Create a notifier whose subscribers buffer at most `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _rx) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Register a subscriber.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Tell every subscriber that `page_name` changed.
    ///
    /// Returns the number of subscribers reached. Having none is not an error.
    pub fn emit(&self, page_name: &str) -> usize {
        let reached = self
            .sender
            .send(ContentChanged::new(page_name))
            .unwrap_or(0);
        tracing::debug!(page = %page_name, subscribers = reached, "Content change emitted");
        reached
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// A registered consumer of change events.
///
/// Dropping the subscription unregisters it.
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<ContentChanged>,
}

impl Subscription {
    /// Wait for the next change.
    ///
    /// If this subscriber fell behind, older events are skipped and a change is
    /// reported for the newest one still buffered. Returns `None` once every
    /// notifier is gone.
    pub async fn changed(&mut self) -> Option<ContentChanged> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Change subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Take a pending change without waiting.
    pub fn try_changed(&mut self) -> Option<ContentChanged> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => {}
                Err(
                    broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
                ) => return None,
            }
        }
    }
}
