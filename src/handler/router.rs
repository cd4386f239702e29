//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: preflight handling, API dispatch,
//! the landing page, public assets, common headers and access logging.

use crate::api::{self, ApiRoute};
use crate::config::{AppState, HttpConfig};
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, SERVER, USER_AGENT};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let access_log = state.config.logging.access_log;
    let entry = access_log.then(|| access_entry(&req, remote_addr));

    let mut response = route_request(req, &state).await;
    apply_common_headers(&mut response, &state.config.http);

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_default();
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn access_entry<B>(req: &Request<B>, remote_addr: SocketAddr) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        remote_addr.to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format!("{:?}", req.version())
        .trim_start_matches("HTTP/")
        .to_string();
    entry.user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    entry
}

/// Route request based on method and path
async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    if method == Method::OPTIONS {
        return http::build_options_response(state.config.http.enable_cors);
    }

    // 1. API routes
    if let Some(route) = ApiRoute::parse(req.uri().path()) {
        return api::handle_api_request(req, route, state).await;
    }

    // 2. Everything else is read-only
    let is_head = method == Method::HEAD;
    if method != Method::GET && !is_head {
        logger::log_debug(&format!("Method not allowed: {method} {}", req.uri().path()));
        return http::build_405_response("GET, HEAD, OPTIONS");
    }

    // 3. Landing page, then public assets
    let path = req.uri().path();
    if path == "/" {
        return static_files::serve_index(&state.config.static_files, is_head).await;
    }
    static_files::serve_public(&state.config.static_files.public_dir, path, is_head).await
}

/// Server name on every response; CORS origin header when enabled
fn apply_common_headers(response: &mut Response<Full<Bytes>>, config: &HttpConfig) {
    let headers = response.headers_mut();
    if let Ok(server) = HeaderValue::from_str(&config.server_name) {
        headers.insert(SERVER, server);
    }
    if config.enable_cors {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::Store;
    use http_body_util::BodyExt;
    use serde_json::Value;

    fn test_state() -> Arc<AppState> {
        let mut config = Config::default();
        config.logging.access_log = false;
        config.static_files.index_file = "does/not/exist.html".to_string();
        Arc::new(AppState::new(config, Arc::new(Store::in_memory())))
    }

    fn addr() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 40000))
    }

    async fn send(
        state: &Arc<AppState>,
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: &str,
    ) -> (u16, Response<Full<Bytes>>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header("Content-Type", ct);
        }
        let req = builder.body(Full::new(Bytes::from(body.to_string()))).unwrap();
        let response = handle_request(req, Arc::clone(state), addr()).await.unwrap();
        (response.status().as_u16(), response)
    }

    async fn body_text(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response<Full<Bytes>>) -> Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    async fn post_json(state: &Arc<AppState>, uri: &str, body: &str) -> (u16, Value) {
        let (status, response) =
            send(state, Method::POST, uri, Some("application/json"), body).await;
        (status, body_json(response).await)
    }

    async fn get_json(state: &Arc<AppState>, uri: &str) -> (u16, Value) {
        let (status, response) = send(state, Method::GET, uri, None, "").await;
        (status, body_json(response).await)
    }

    #[tokio::test]
    async fn test_user_exercise_log_scenario() {
        let state = test_state();

        let (status, user) = post_json(&state, "/api/users", r#"{"username":"fcc_test"}"#).await;
        assert_eq!(status, 200);
        assert_eq!(user["username"], "fcc_test");
        let id = user["id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());

        let (status, exercise) = post_json(
            &state,
            &format!("/api/users/{id}/exercises"),
            r#"{"description":"test run","duration":30,"date":"2023-01-15"}"#,
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(
            exercise,
            serde_json::json!({
                "id": id,
                "username": "fcc_test",
                "date": "Sun Jan 15 2023",
                "duration": 30,
                "description": "test run",
            })
        );

        let (status, log) = get_json(&state, &format!("/api/users/{id}/logs")).await;
        assert_eq!(status, 200);
        assert_eq!(
            log,
            serde_json::json!({
                "id": id,
                "username": "fcc_test",
                "count": 1,
                "log": [{"description": "test run", "duration": 30, "date": "Sun Jan 15 2023"}],
            })
        );
    }

    #[tokio::test]
    async fn test_form_encoded_bodies_are_accepted() {
        let state = test_state();
        let (status, response) = send(
            &state,
            Method::POST,
            "/api/users",
            Some("application/x-www-form-urlencoded"),
            "username=form_user",
        )
        .await;
        assert_eq!(status, 200);
        let user = body_json(response).await;
        let id = user["id"].as_str().unwrap().to_string();

        let (status, response) = send(
            &state,
            Method::POST,
            &format!("/api/users/{id}/exercises"),
            Some("application/x-www-form-urlencoded"),
            "description=pushups&duration=15&date=",
        )
        .await;
        assert_eq!(status, 200);
        let exercise = body_json(response).await;
        assert_eq!(exercise["duration"], 15);
        assert_eq!(exercise["username"], "form_user");
    }

    #[tokio::test]
    async fn test_list_users() {
        let state = test_state();
        post_json(&state, "/api/users", r#"{"username":"a"}"#).await;
        post_json(&state, "/api/users", r#"{"username":"b"}"#).await;

        let (status, users) = get_json(&state, "/api/users").await;
        assert_eq!(status, 200);
        let names: Vec<_> = users
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["username"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(users[0]["id"].is_string());
    }

    #[tokio::test]
    async fn test_logs_filters_and_limits() {
        let state = test_state();
        let (_, user) = post_json(&state, "/api/users", r#"{"username":"runner"}"#).await;
        let id = user["id"].as_str().unwrap().to_string();
        for date in ["2023-01-01", "2023-01-10", "2023-01-20", "2023-02-01"] {
            post_json(
                &state,
                &format!("/api/users/{id}/exercises"),
                &format!(r#"{{"description":"run {date}","duration":20,"date":"{date}"}}"#),
            )
            .await;
        }

        let (status, log) = get_json(
            &state,
            &format!("/api/users/{id}/logs?from=2023-01-10&to=2023-01-20"),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(log["count"], 2);
        assert_eq!(log["log"][0]["date"], "Tue Jan 10 2023");
        assert_eq!(log["log"][1]["date"], "Fri Jan 20 2023");

        let (_, log) = get_json(&state, &format!("/api/users/{id}/logs?limit=1")).await;
        assert_eq!(log["count"], 1);
        assert_eq!(log["log"][0]["description"], "run 2023-01-01");
    }

    #[tokio::test]
    async fn test_validation_errors_are_400() {
        let state = test_state();
        let (status, response) = send(
            &state,
            Method::POST,
            "/api/users",
            Some("application/json"),
            "{}",
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body_text(response).await, "`username` is required");

        let (status, _) = send(
            &state,
            Method::POST,
            "/api/users",
            Some("application/json"),
            "{\"username\":",
        )
        .await;
        assert_eq!(status, 400);
    }

    #[tokio::test]
    async fn test_unknown_user_is_404() {
        let state = test_state();
        let (status, response) = send(
            &state,
            Method::POST,
            "/api/users/missing/exercises",
            Some("application/json"),
            r#"{"description":"ghost","duration":5}"#,
        )
        .await;
        assert_eq!(status, 404);
        assert_eq!(body_text(response).await, "Unknown userId: missing");

        let (status, _) = send(&state, Method::GET, "/api/users/missing/logs", None, "").await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_store_failure_is_opaque_500() {
        let path = crate::store::tests::temp_path("router.json");
        let blocker = path.with_extension("tmp");
        std::fs::create_dir_all(&blocker).unwrap();
        let mut config = Config::default();
        config.logging.access_log = false;
        let state = Arc::new(AppState::new(
            config,
            Arc::new(Store::open(&path).await.unwrap()),
        ));

        let (status, response) = send(
            &state,
            Method::POST,
            "/api/users",
            Some("application/json"),
            r#"{"username":"x"}"#,
        )
        .await;
        let _ = std::fs::remove_dir_all(&blocker);
        assert_eq!(status, 500);
        assert_eq!(body_text(response).await, "Server error");
    }

    #[tokio::test]
    async fn test_oversized_body_is_413() {
        let mut config = Config::default();
        config.logging.access_log = false;
        config.http.max_body_size = 16;
        let state = Arc::new(AppState::new(config, Arc::new(Store::in_memory())));

        let (status, _) = send(
            &state,
            Method::POST,
            "/api/users",
            Some("application/json"),
            r#"{"username":"a very long username indeed"}"#,
        )
        .await;
        assert_eq!(status, 413);
    }

    #[tokio::test]
    async fn test_wrong_method_is_405() {
        let state = test_state();
        let (status, response) = send(&state, Method::DELETE, "/api/users", None, "").await;
        assert_eq!(status, 405);
        assert_eq!(response.headers()["Allow"], "GET, POST, OPTIONS");

        let (status, _) = send(&state, Method::GET, "/api/users/abc/exercises", None, "").await;
        assert_eq!(status, 405);

        let (status, _) = send(&state, Method::POST, "/", None, "").await;
        assert_eq!(status, 405);
    }

    #[tokio::test]
    async fn test_landing_page_and_unknown_paths() {
        let state = test_state();
        let (status, response) = send(&state, Method::GET, "/", None, "").await;
        assert_eq!(status, 200);
        assert!(body_text(response).await.contains("Exercise tracker"));

        let (status, response) = send(&state, Method::HEAD, "/", None, "").await;
        assert_eq!(status, 200);
        assert!(body_text(response).await.is_empty());

        let (status, _) = send(&state, Method::GET, "/no/such/file.css", None, "").await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_cors_and_server_headers() {
        let state = test_state();
        let (status, response) = send(&state, Method::GET, "/api/users", None, "").await;
        assert_eq!(status, 200);
        assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");
        assert_eq!(
            response.headers()["Server"],
            state.config.http.server_name.as_str()
        );

        let (status, response) = send(&state, Method::OPTIONS, "/api/users", None, "").await;
        assert_eq!(status, 204);
        assert!(response
            .headers()
            .contains_key("Access-Control-Allow-Methods"));
    }
}
