//! Integration tests for the session endpoints.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use whodunit_core::config::GameConfig;
use whodunit_core::phase::Phase;
use whodunit_story_client::SessionStore;
use whodunit_test_support::{ScriptedStoryService, session_status};

fn create_body() -> serde_json::Value {
    json!({
        "local_participant": "Ada",
        "participants": [
            { "name": "Ada", "is_simulated": false },
            { "name": "Basil", "is_simulated": true },
            { "name": "Clara", "is_simulated": true }
        ]
    })
}

/// Pacing with no DM pause, so the speak phase opens without real sleeps.
fn instant_config() -> GameConfig {
    GameConfig {
        dm_speak_delay: Duration::ZERO,
        simulated_stagger: Duration::ZERO,
        ..GameConfig::default()
    }
}

#[tokio::test]
async fn test_create_and_start_reaches_the_dm_phase() {
    // Arrange
    let app = common::build_test_app();
    let (status, created) = common::post_json(app.clone(), "/api/v1/sessions", &create_body()).await;
    assert_eq!(status, StatusCode::OK);
    let id = created["session_id"].as_str().unwrap().to_owned();

    // Act
    let (status, view) =
        common::post_json(app.clone(), &format!("/api/v1/sessions/{id}/start"), &json!({})).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["phase"], "dm_speak");
    assert_eq!(view["chapter"], 1);
    assert_eq!(view["cycle"], 1);
    assert_eq!(view["halted"], false);
}

#[tokio::test]
async fn test_feed_carries_the_chapter_opening() {
    // Arrange
    let app = common::build_test_app();
    let (_, created) = common::post_json(app.clone(), "/api/v1/sessions", &create_body()).await;
    let id = created["session_id"].as_str().unwrap().to_owned();
    common::post_json(app.clone(), &format!("/api/v1/sessions/{id}/start"), &json!({})).await;

    // Act
    let (status, feed) =
        common::get_json(app.clone(), &format!("/api/v1/sessions/{id}/feed")).await;

    // Assert — a phase event followed by the DM narration.
    assert_eq!(status, StatusCode::OK);
    let events = feed["events"].as_array().unwrap();
    assert_eq!(events[0]["type"], "phase");
    assert!(events.iter().any(|e| {
        e["type"] == "dm" && e["content"].as_str().unwrap().contains("Chapter 1 opens")
    }));

    // Polling from `next` returns nothing new.
    let next = feed["next"].as_u64().unwrap();
    let (_, tail) = common::get_json(
        app.clone(),
        &format!("/api/v1/sessions/{id}/feed?since={next}"),
    )
    .await;
    assert!(tail["events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_speech_is_rejected_outside_the_speak_phase() {
    // Arrange — created but never started.
    let app = common::build_test_app();
    let (_, created) = common::post_json(app.clone(), "/api/v1/sessions", &create_body()).await;
    let id = created["session_id"].as_str().unwrap().to_owned();

    // Act
    let (status, json) = common::post_json(
        app.clone(),
        &format!("/api/v1/sessions/{id}/speech"),
        &json!({ "content": "too early" }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_speech_is_recorded_once_the_speak_phase_opens() {
    // Arrange — no DM pause, so the speak phase opens right after start.
    let service = Arc::new(ScriptedStoryService::new());
    let app = common::build_test_app_with(Arc::clone(&service), instant_config());
    let (_, created) = common::post_json(app.clone(), "/api/v1/sessions", &create_body()).await;
    let id = created["session_id"].as_str().unwrap().to_owned();
    common::post_json(app.clone(), &format!("/api/v1/sessions/{id}/start"), &json!({})).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Act
    let (status, view) = common::post_json(
        app.clone(),
        &format!("/api/v1/sessions/{id}/speech"),
        &json!({
            "content": "I was in the library.",
            "queries": { "Basil": "Where were you?" }
        }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["phase"], "player_speak");
    assert!(
        view["spoken"]
            .as_array()
            .unwrap()
            .iter()
            .any(|n| n == "Ada")
    );
}

#[tokio::test]
async fn test_starting_twice_returns_400() {
    // Arrange
    let app = common::build_test_app();
    let (_, created) = common::post_json(app.clone(), "/api/v1/sessions", &create_body()).await;
    let id = created["session_id"].as_str().unwrap().to_owned();
    common::post_json(app.clone(), &format!("/api/v1/sessions/{id}/start"), &json!({})).await;

    // Act
    let (status, json) =
        common::post_json(app.clone(), &format!("/api/v1/sessions/{id}/start"), &json!({})).await;

    // Assert
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_chapter_start_failure_surfaces_as_502_and_halts() {
    // Arrange
    let service = Arc::new(ScriptedStoryService::new().with_failing_chapter_start());
    let app = common::build_test_app_with(service, GameConfig::default());
    let (_, created) = common::post_json(app.clone(), "/api/v1/sessions", &create_body()).await;
    let id = created["session_id"].as_str().unwrap().to_owned();

    // Act
    let (status, json) =
        common::post_json(app.clone(), &format!("/api/v1/sessions/{id}/start"), &json!({})).await;

    // Assert
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "story_service_error");
    let (_, view) = common::get_json(app.clone(), &format!("/api/v1/sessions/{id}/status")).await;
    assert_eq!(view["halted"], true);
}

#[tokio::test]
async fn test_persisted_session_is_rebound_and_resumed_after_a_restart() {
    // Arrange — the first server run persists the created session.
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SessionStore::new(dir.path().join("session.json")));
    let app = common::build_test_app_with_store(
        Arc::new(ScriptedStoryService::new()),
        GameConfig::default(),
        Arc::clone(&store),
    );
    let (_, created) = common::post_json(app.clone(), "/api/v1/sessions", &create_body()).await;
    let id = created["session_id"].as_str().unwrap().to_owned();
    let stored = store.load().unwrap().expect("session was persisted");
    assert_eq!(stored.session_id.to_string(), id);
    assert_eq!(stored.local_participant, "Ada");

    // Act — a fresh app stands in for a restarted server; the stored id
    // rebinds the remote session, which reports chapter 2 mid-speak.
    let service = Arc::new(
        ScriptedStoryService::new().with_status(session_status(2, 1, Phase::PlayerSpeak)),
    );
    let restarted =
        common::build_test_app_with_store(service, GameConfig::default(), Arc::clone(&store));
    let mut body = create_body();
    body["session_id"] = json!(stored.session_id);
    let (status, rebound) =
        common::post_json(restarted.clone(), "/api/v1/sessions", &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rebound["session_id"].as_str().unwrap(), id);
    let (status, view) = common::post_json(
        restarted.clone(),
        &format!("/api/v1/sessions/{id}/resume"),
        &json!({}),
    )
    .await;

    // Assert — resume re-entered the reported position.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["chapter"], 2);
    assert_eq!(view["cycle"], 1);
    assert_eq!(view["phase"], "player_speak");
}

#[tokio::test]
async fn test_creating_with_a_registered_id_returns_400() {
    // Arrange
    let app = common::build_test_app();
    let (_, created) = common::post_json(app.clone(), "/api/v1/sessions", &create_body()).await;
    let id = created["session_id"].as_str().unwrap().to_owned();
    let mut body = create_body();
    body["session_id"] = json!(id);

    // Act
    let (status, json) = common::post_json(app.clone(), "/api/v1/sessions", &body).await;

    // Assert
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_status_of_unknown_session_returns_404() {
    let app = common::build_test_app();
    let id = uuid::Uuid::new_v4();

    let (status, json) = common::get_json(app, &format!("/api/v1/sessions/{id}/status")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "session_not_found");
}
