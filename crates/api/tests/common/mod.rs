#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use courses_api::config::ServerConfig;
use courses_api::router::build_app_router;
use courses_api::state::AppState;
use courses_core::duration::VideoDuration;
use courses_core::video_lookup::VideoLookup;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Watch link the fake lookup resolves to 45:30.
pub const LONG_VIDEO_URL: &str = "https://www.youtube.com/watch?v=AAAAAAAAAAA";
/// Watch link the fake lookup resolves to 30:40.
pub const SHORT_VIDEO_URL: &str = "https://www.youtube.com/watch?v=BBBBBBBBBBB";

/// Deterministic lookup: canned durations per URL, sentinel otherwise.
#[derive(Default)]
pub struct FakeLookup {
    durations: HashMap<String, VideoDuration>,
    pub calls: AtomicUsize,
}

impl FakeLookup {
    pub fn standard() -> Self {
        let durations = [
            (LONG_VIDEO_URL, VideoDuration::from_hms(0, 45, 30)),
            (SHORT_VIDEO_URL, VideoDuration::from_hms(0, 30, 40)),
        ]
        .into_iter()
        .map(|(url, d)| (url.to_string(), d))
        .collect();
        Self {
            durations,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoLookup for FakeLookup {
    async fn fetch_duration(&self, url: &str) -> VideoDuration {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.durations.get(url).copied().unwrap_or(VideoDuration::ZERO)
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        lookup_timeout_secs: 1,
        db_max_connections: 5,
    }
}

/// Build the full application router backed by `pool` and the standard
/// fake lookup.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_lookup(pool, Arc::new(FakeLookup::standard()))
}

/// Build the full application router with a caller-supplied lookup.
pub fn build_test_app_with_lookup(pool: PgPool, lookup: Arc<dyn VideoLookup>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        video_lookup: lookup,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response {
    send(app, Method::POST, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
