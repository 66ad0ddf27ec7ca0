//! Error types for the HTTP server.

use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use folio_store::{StoreError, StoreErrorKind};

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Write without a valid admin token.
    #[error("Unauthorized")]
    Unauthorized,

    /// Malformed request header.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body is not a valid publish payload.
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({"success": false, "error": "Unauthorized"}),
            ),
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                json!({"success": false, "error": message}),
            ),
            Self::Body(rejection) => (
                rejection.status(),
                json!({
                    "success": false,
                    "error": "Invalid request body",
                    "message": rejection.body_text(),
                }),
            ),
            Self::Store(e) => {
                let (status, error) = match e.kind {
                    StoreErrorKind::InvalidPageName => {
                        (StatusCode::BAD_REQUEST, "Invalid page name")
                    }
                    StoreErrorKind::Conflict => (StatusCode::PRECONDITION_FAILED, "Conflict"),
                    StoreErrorKind::NotFound => (StatusCode::NOT_FOUND, "Page not found"),
                    _ => {
                        tracing::error!(error = %e, "Store operation failed");
                        (StatusCode::INTERNAL_SERVER_ERROR, "Store error")
                    }
                };
                (
                    status,
                    json!({
                        "success": false,
                        "error": error,
                        "message": e.to_string(),
                        "page": e.page,
                    }),
                )
            }
        };

        let mut response = (status, axum::Json(body)).into_response();
        if matches!(self, Self::Unauthorized) {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}
