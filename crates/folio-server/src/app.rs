//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::changes;
use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/pages", get(handlers::pages::list_pages))
        .route(
            "/api/pages/{page_name}",
            get(handlers::pages::get_page).post(handlers::pages::publish_page),
        );

    let mut router = Router::new().merge(api_routes);

    if state.changes_enabled {
        router = router.route("/ws/changes", get(changes::ws_handler));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::security_headers()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use axum::response::Response;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use folio_content::ChangeNotifier;
    use folio_store::{ContentStore, MemoryStore};

    use super::*;

    struct TestApp {
        router: Router,
        store: Arc<MemoryStore>,
        notifier: ChangeNotifier,
    }

    fn app_with(admin_token: Option<&str>, changes_enabled: bool) -> TestApp {
        let store = Arc::new(MemoryStore::new());
        let notifier = ChangeNotifier::default();
        let shared = Arc::clone(&store);
        let state = Arc::new(AppState {
            store: shared,
            notifier: notifier.clone(),
            changes_enabled,
            admin_token: admin_token.map(str::to_owned),
        });
        TestApp {
            router: create_router(state),
            store,
            notifier,
        }
    }

    fn app() -> TestApp {
        app_with(None, true)
    }

    async fn send(router: &Router, request: Request<Body>) -> (Response<()>, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let (parts, body) = response.into_parts();
        let bytes = to_bytes(body, usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (Response::from_parts(parts, ()), json)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, headers: &[(&str, &str)], payload: &Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::from(payload.to_string())).unwrap()
    }

    fn etag(response: &Response<()>) -> Option<String> {
        response
            .headers()
            .get(header::ETAG)
            .map(|v| v.to_str().unwrap().to_owned())
    }

    #[tokio::test]
    async fn test_get_missing_page_synthesizes_template() {
        let app = app();

        let (response, body) = send(&app.router, get("/api/pages/contact")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["pageName"], "contact");
        assert_eq!(body["data"]["published"], false);
        assert!(body["data"]["sections"]["info"].is_object());
        assert_eq!(etag(&response), None);
        assert_eq!(app.store.get("contact").unwrap(), None);
    }

    #[tokio::test]
    async fn test_post_then_get() {
        let app = app();
        let payload = json!({"sections": {"hero": {"title": "Hi"}}, "published": true});

        let (response, body) = send(&app.router, post("/api/pages/home", &[], &payload)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body["data"]["sections"]["hero"]["title"], "Hi");
        let written = etag(&response).unwrap();

        let (response, body) = send(&app.router, get("/api/pages/home")).await;
        assert_eq!(body["data"]["published"], true);
        assert_eq!(etag(&response), Some(written));
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
    }

    #[tokio::test]
    async fn test_post_preserves_created_at() {
        let app = app();
        let payload = json!({"sections": {}});

        let (_, first) = send(&app.router, post("/api/pages/about", &[], &payload)).await;
        let (_, second) = send(&app.router, post("/api/pages/about", &[], &payload)).await;

        assert_eq!(second["data"]["createdAt"], first["data"]["createdAt"]);
        assert_ne!(second["data"]["updatedAt"], first["data"]["updatedAt"]);
    }

    #[tokio::test]
    async fn test_stale_if_match_is_precondition_failed() {
        let app = app();
        let payload = json!({"sections": {"hero": {"title": "A"}}});
        let (response, _) = send(&app.router, post("/api/pages/home", &[], &payload)).await;
        let first = etag(&response).unwrap();
        let (response, _) = send(
            &app.router,
            post("/api/pages/home", &[("if-match", first.as_str())], &payload),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let (response, body) = send(
            &app.router,
            post("/api/pages/home", &[("if-match", first.as_str())], &payload),
        )
        .await;

        assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Conflict");
    }

    #[tokio::test]
    async fn test_if_none_match_star_only_creates() {
        let app = app();
        let payload = json!({"sections": {}});

        let (first, _) = send(
            &app.router,
            post("/api/pages/home", &[("if-none-match", "*")], &payload),
        )
        .await;
        let (second, _) = send(
            &app.router,
            post("/api/pages/home", &[("if-none-match", "*")], &payload),
        )
        .await;

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::PRECONDITION_FAILED);
    }

    #[tokio::test]
    async fn test_invalid_page_name_is_bad_request() {
        let app = app();

        let (response, body) = send(&app.router, get("/api/pages/no%20spaces")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid page name");
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let app = app();

        let (response, body) = send(
            &app.router,
            post("/api/pages/home", &[], &json!({"sections": "nope"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid request body");
        assert!(body["message"].is_string());
        assert_eq!(app.store.get("home").unwrap(), None);
    }

    #[tokio::test]
    async fn test_unparsable_body_uses_error_envelope() {
        let app = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/pages/home")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (response, body) = send(&app.router, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_unauthorized_write_is_rejected_before_body() {
        let app = app_with(Some("s3cret"), true);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/pages/home")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (response, body) = send(&app.router, request).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_admin_token_gates_writes() {
        let app = app_with(Some("s3cret"), true);
        let payload = json!({"sections": {}});

        let (denied, _) = send(&app.router, post("/api/pages/home", &[], &payload)).await;
        let (wrong, _) = send(
            &app.router,
            post("/api/pages/home", &[("authorization", "Bearer nope")], &payload),
        )
        .await;
        let (allowed, _) = send(
            &app.router,
            post("/api/pages/home", &[("authorization", "Bearer s3cret")], &payload),
        )
        .await;
        let (read, _) = send(&app.router, get("/api/pages/home")).await;

        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(allowed.status(), StatusCode::OK);
        assert_eq!(read.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_post_emits_change() {
        let app = app();
        let mut subscription = app.notifier.subscribe();

        send(
            &app.router,
            post("/api/pages/services", &[], &json!({"sections": {}})),
        )
        .await;

        assert_eq!(
            subscription.try_changed().map(|event| event.page_name),
            Some("services".to_owned())
        );
    }

    #[tokio::test]
    async fn test_failed_post_emits_nothing() {
        let app = app_with(Some("s3cret"), true);
        let mut subscription = app.notifier.subscribe();

        send(
            &app.router,
            post("/api/pages/services", &[], &json!({"sections": {}})),
        )
        .await;

        assert_eq!(subscription.try_changed(), None);
    }

    #[tokio::test]
    async fn test_list_pages() {
        let app = app();
        for page in ["services", "about"] {
            send(
                &app.router,
                post(&format!("/api/pages/{page}"), &[], &json!({"sections": {}})),
            )
            .await;
        }

        let (_, body) = send(&app.router, get("/api/pages")).await;

        assert_eq!(body, json!({"success": true, "data": ["about", "services"]}));
    }

    #[tokio::test]
    async fn test_security_headers() {
        let app = app();

        let (response, _) = send(&app.router, get("/api/pages/home")).await;

        let headers = response.headers();
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
        assert!(headers.contains_key("content-security-policy"));
    }

    #[tokio::test]
    async fn test_change_feed_route_disabled() {
        let app = app_with(None, false);

        let (response, _) = send(&app.router, get("/ws/changes")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
