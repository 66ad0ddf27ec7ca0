//! HTTP backend.
//!
//! Talks to the pages API of a Folio server:
//!
//! - `GET  {base}/api/pages/{page}` returns `{success, data}` plus an `ETag`
//!   when the page is persisted
//! - `POST {base}/api/pages/{page}` with `{sections, published}` upserts;
//!   `If-Match` / `If-None-Match: *` carry the write precondition and a
//!   failed precondition answers `412`

use std::time::Duration;

use serde::{Deserialize, Serialize};
use ureq::Agent;
use ureq::http::Response;

use folio_store::{
    FetchedPage, PageContentDocument, Precondition, Revision, Sections, validate_page_name,
};

use super::{BackendError, ContentBackend};

/// Connect timeout. Writes themselves are not timed out.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Successful response envelope.
#[derive(Deserialize)]
struct PageEnvelope {
    data: PageContentDocument,
}

/// Write request body.
#[derive(Serialize)]
struct PublishRequest<'a> {
    sections: &'a Sections,
    published: bool,
}

/// Backend for a remote Folio server.
pub struct HttpBackend {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    /// Create a backend for the server at `base_url` (e.g. `http://127.0.0.1:7980`).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_connect(Some(CONNECT_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: None,
        }
    }

    /// Send `Authorization: Bearer {token}` with writes.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn page_url(&self, page_name: &str) -> Result<String, BackendError> {
        validate_page_name(page_name)?;
        Ok(format!("{}/api/pages/{page_name}", self.base_url))
    }

    fn read_page(
        page_name: &str,
        response: Response<ureq::Body>,
    ) -> Result<FetchedPage, BackendError> {
        let status = response.status().as_u16();
        let revision = response
            .headers()
            .get("etag")
            .and_then(|v| v.to_str().ok())
            .and_then(Revision::parse);
        let mut body = response.into_body();

        if status == 412 {
            return Err(BackendError::Conflict {
                page: page_name.to_owned(),
            });
        }

        if status >= 400 {
            let message = body
                .read_to_string()
                .map(|text| error_message(&text))
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(BackendError::HttpResponse { status, message });
        }

        let envelope: PageEnvelope = body.read_json()?;
        Ok(FetchedPage {
            document: envelope.data,
            revision,
        })
    }
}

impl ContentBackend for HttpBackend {
    fn fetch(&self, page_name: &str) -> Result<FetchedPage, BackendError> {
        let url = self.page_url(page_name)?;
        tracing::debug!(url = %url, "Fetching page");

        let response = self
            .agent
            .get(&url)
            .header("Accept", "application/json")
            .call()?;

        Self::read_page(page_name, response)
    }

    fn persist(
        &self,
        page_name: &str,
        sections: Sections,
        published: bool,
        precondition: &Precondition,
    ) -> Result<FetchedPage, BackendError> {
        let url = self.page_url(page_name)?;
        tracing::debug!(url = %url, ?precondition, "Persisting page");

        let mut request = self
            .agent
            .post(&url)
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }
        request = match precondition {
            Precondition::Any => request,
            Precondition::Missing => request.header("If-None-Match", "*"),
            Precondition::Matches(revision) => request.header("If-Match", revision.as_str()),
        };

        let response = request.send_json(&PublishRequest {
            sections: &sections,
            published,
        })?;

        Self::read_page(page_name, response)
    }
}

/// Pull the `error` field out of a JSON error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json.get("error")?.as_str().map(str::to_owned))
        .unwrap_or_else(|| body.trim().to_owned())
}
