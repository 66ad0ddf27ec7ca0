//! Pages API endpoints.
//!
//! Serves and upserts page content documents. Responses use the
//! `{success, data}` envelope; the document revision travels in the `ETag`
//! header, and writes accept it back through `If-Match`.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use folio_store::{Precondition, Revision, Sections};

use crate::error::ServerError;
use crate::state::AppState;

/// Successful response envelope.
#[derive(Serialize)]
struct Envelope<T> {
    success: bool,
    data: T,
}

impl<T: Serialize> Envelope<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// Body of POST /api/pages/{pageName}.
#[derive(Deserialize)]
pub(crate) struct PublishBody {
    sections: Sections,
    #[serde(default = "default_published")]
    published: bool,
}

fn default_published() -> bool {
    true
}

/// Handle GET /api/pages.
pub(crate) async fn list_pages(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let pages = state.store.list()?;
    Ok(Envelope::ok(pages))
}

/// Handle GET /api/pages/{pageName}.
///
/// Pages that were never written are synthesized from their default
/// template and returned without an `ETag`.
pub(crate) async fn get_page(
    Path(page_name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let fetched = state.store.fetch_or_default(&page_name)?;
    Ok(page_response(fetched.revision.as_ref(), fetched.document))
}

/// Handle POST /api/pages/{pageName}.
pub(crate) async fn publish_page(
    Path(page_name): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<PublishBody>, JsonRejection>,
) -> Result<Response, ServerError> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if !state.may_write(authorization) {
        tracing::warn!(page = %page_name, "Rejected unauthorized write");
        return Err(ServerError::Unauthorized);
    }

    let Json(body) = body?;
    let precondition = precondition_from_headers(&headers)?;
    let document = state
        .store
        .put(&page_name, body.sections, body.published, &precondition)?;
    let revision = document.revision();

    tracing::info!(
        page = %page_name,
        published = document.published,
        revision = %revision,
        "Page written"
    );
    state.notifier.emit(&page_name);

    Ok(page_response(Some(&revision), document))
}

fn page_response<T: Serialize>(revision: Option<&Revision>, document: T) -> Response {
    let mut response = Envelope::ok(document).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    if let Some(etag) = revision.and_then(|r| HeaderValue::from_str(r.as_str()).ok()) {
        headers.insert(header::ETAG, etag);
    }
    response
}

/// Write precondition from `If-Match` / `If-None-Match`.
///
/// `If-Match: <revision>` requires the page to be at that revision and
/// `If-None-Match: *` requires it not to exist yet. Without either header the
/// write is unconditional.
fn precondition_from_headers(headers: &HeaderMap) -> Result<Precondition, ServerError> {
    if let Some(value) = header_str(headers, &header::IF_MATCH)? {
        return Revision::parse(value)
            .map(Precondition::Matches)
            .ok_or_else(|| ServerError::BadRequest(format!("Unsupported If-Match value: {value}")));
    }

    match header_str(headers, &header::IF_NONE_MATCH)? {
        None => Ok(Precondition::Any),
        Some("*") => Ok(Precondition::Missing),
        Some(value) => Err(ServerError::BadRequest(format!(
            "Unsupported If-None-Match value: {value}"
        ))),
    }
}

fn header_str<'a>(
    headers: &'a HeaderMap,
    name: &HeaderName,
) -> Result<Option<&'a str>, ServerError> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map(str::trim)
                .map_err(|_| ServerError::BadRequest(format!("Invalid {name} header")))
        })
        .transpose()
}
