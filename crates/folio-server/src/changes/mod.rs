//! Change feed.
//!
//! Forwards [`folio_content::ContentChanged`] events to WebSocket clients so
//! remote content consumers know when to re-fetch.

mod websocket;

pub(crate) use websocket::ws_handler;
