//! `/ws/changes` connections.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use folio_content::ContentChanged;

use crate::state::AppState;

/// Upgrade to a change feed connection.
pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Stream change events until either side goes away.
///
/// Incoming frames other than `Close` are ignored; clients only send pings.
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut subscription = state.notifier.subscribe();
    tracing::debug!(
        subscribers = state.notifier.subscriber_count(),
        "Change feed client connected"
    );

    loop {
        tokio::select! {
            event = subscription.changed() => {
                let Some(event) = event else { break };
                if !forward(&mut socket, &event).await {
                    break;
                }
            }
            frame = socket.recv() => match frame {
                Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::debug!("Change feed client disconnected");
}

/// Send one event. Returns `false` once the client is gone.
async fn forward(socket: &mut WebSocket, event: &ContentChanged) -> bool {
    match serde_json::to_string(event) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            tracing::error!(error = %e, page = %event.page_name, "Failed to encode change event");
            true
        }
    }
}
