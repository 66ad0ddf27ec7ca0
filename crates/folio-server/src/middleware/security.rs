//! Security response headers.
//!
//! The API only answers JSON and WebSocket upgrades, so the policy forbids
//! loading or framing anything.

use axum::http::HeaderValue;
use axum::http::header::{self, HeaderName};
use tower::ServiceBuilder;
use tower::layer::util::{Identity, Stack};
use tower_http::set_header::SetResponseHeaderLayer;

const CONTENT_SECURITY_POLICY: &str =
    "default-src 'none'; connect-src 'self' ws: wss:; frame-ancestors 'none'";

type HeaderLayer = SetResponseHeaderLayer<HeaderValue>;

/// Layers stamping the security headers on every response.
pub(crate) type SecurityHeaders =
    ServiceBuilder<Stack<HeaderLayer, Stack<HeaderLayer, Stack<HeaderLayer, Identity>>>>;

fn overriding(name: HeaderName, value: &'static str) -> HeaderLayer {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

/// Build the security header layers. Values override any set by handlers.
pub(crate) fn security_headers() -> SecurityHeaders {
    ServiceBuilder::new()
        .layer(overriding(
            header::CONTENT_SECURITY_POLICY,
            CONTENT_SECURITY_POLICY,
        ))
        .layer(overriding(header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .layer(overriding(header::X_FRAME_OPTIONS, "DENY"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_blocks_everything_but_websockets() {
        assert!(CONTENT_SECURITY_POLICY.starts_with("default-src 'none'"));
        assert!(CONTENT_SECURITY_POLICY.contains("connect-src 'self' ws: wss:"));
        assert!(!CONTENT_SECURITY_POLICY.contains("script-src"));
    }
}
