//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use whodunit_api::routes;
use whodunit_api::state::{AppState, StoryServiceFactory};
use whodunit_core::clock::Clock;
use whodunit_core::config::GameConfig;
use whodunit_core::story::StoryService;
use whodunit_story_client::SessionStore;
use whodunit_test_support::{FixedClock, ScriptedStoryService};

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router with a scripted story service and default
/// pacing. Uses the same route structure as `main.rs`.
pub fn build_test_app() -> Router {
    build_test_app_with(Arc::new(ScriptedStoryService::new()), GameConfig::default())
}

/// Build the full app router with a custom scripted service and config,
/// for tests that script remote behavior or shrink the pacing delays.
pub fn build_test_app_with(service: Arc<ScriptedStoryService>, config: GameConfig) -> Router {
    build_app(service, config, None)
}

/// Build the app with a session store attached, for tests that exercise
/// persistence across a simulated restart.
pub fn build_test_app_with_store(
    service: Arc<ScriptedStoryService>,
    config: GameConfig,
    store: Arc<SessionStore>,
) -> Router {
    build_app(service, config, Some(store))
}

fn build_app(
    service: Arc<ScriptedStoryService>,
    config: GameConfig,
    store: Option<Arc<SessionStore>>,
) -> Router {
    let factory: StoryServiceFactory = Arc::new(move |_| {
        let service: Arc<dyn StoryService> = service.clone();
        service
    });
    let mut app_state = AppState::new(factory, config, fixed_clock());
    if let Some(store) = store {
        app_state = app_state.with_store(store);
    }

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/sessions", routes::session::router())
        .with_state(app_state)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
