use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use registrar::registrar_config::{CatalogConfig, CorsConfig, OptionSourceKind, SessionConfig};
use registrar::registrar_filters::{OptionSource, StaticOptionProvider};
use registrar::router::init_router;
use registrar::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

/// App backed by the built-in catalogue.
pub fn setup_test_app() -> Router {
    init_router(setup_test_state(SessionConfig::default()))
}

/// State backed by the built-in catalogue, for tests that drive eviction.
pub fn setup_test_state(session_config: SessionConfig) -> AppState {
    let config = CatalogConfig {
        source: OptionSourceKind::Static,
        ..CatalogConfig::default()
    };
    let provider = OptionSource::Static(StaticOptionProvider::builtin());
    AppState::new(provider, config, CorsConfig::default(), None).with_session_config(session_config)
}

/// App whose backend is unreachable, with fallback data enabled.
#[allow(dead_code)]
pub fn setup_unreachable_app() -> Router {
    let config = CatalogConfig {
        source: OptionSourceKind::Http,
        base_url: "http://127.0.0.1:9/api".to_string(),
        fetch_timeout: Duration::from_secs(2),
        allow_mock_fallback: true,
        ..CatalogConfig::default()
    };
    let provider = OptionSource::from_config(&config).unwrap();
    init_router(AppState::new(provider, config, CorsConfig::default(), None))
}

/// Sends a request and returns the status with the decoded JSON body
/// (`Value::Null` for empty bodies).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

/// Creates a session and returns its id.
#[allow(dead_code)]
pub async fn create_session(app: &Router, body: Value) -> String {
    let (status, body) = send(app, "POST", "/api/filter-sessions", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    body["id"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
pub fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}
