//! Session lifecycle and gameplay endpoints.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::{Json, Router, routing::get, routing::post};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use whodunit_core::error::EngineError;
use whodunit_core::presenter::Presenter;
use whodunit_core::story::ParticipantSpec;
use whodunit_roster::Roster;
use whodunit_scheduler::{Scheduler, SessionView};

use crate::error::ApiError;
use crate::feed::{FeedBuffer, FeedEvent};
use crate::state::{AppState, SessionEntry};

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// A known remote session id to rebind, typically recovered from the
    /// session store after a restart. A fresh id is minted when absent.
    #[serde(default)]
    pub session_id: Option<Uuid>,
    /// The character this client controls; must be a non-simulated
    /// roster member.
    pub local_participant: String,
    /// All characters in the session.
    pub participants: Vec<ParticipantSpec>,
}

/// Response body for POST /.
#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    /// Identifier of the created session.
    pub session_id: Uuid,
}

/// Request body for POST /{id}/speech.
#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    /// What the local participant says.
    pub content: String,
    /// Targeted questions: queried participant name → question text.
    #[serde(default)]
    pub queries: BTreeMap<String, String>,
}

/// Request body for POST /{id}/answer.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// The answer text.
    pub content: String,
}

/// Query parameters for GET /{id}/feed.
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// Offset of the first event to return; defaults to the beginning.
    #[serde(default)]
    pub since: usize,
}

/// Response body for GET /{id}/feed.
#[derive(Debug, Serialize)]
pub struct FeedResponse {
    /// Events from the requested offset onward.
    pub events: Vec<FeedEvent>,
    /// Offset to poll from next.
    pub next: usize,
}

/// POST /
#[instrument(skip(state, request), fields(local = %request.local_participant))]
async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let roster = Roster::from_specs(&request.participants, &request.local_participant)?;
    let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);
    if state.entry(session_id).is_ok() {
        return Err(EngineError::Validation(format!(
            "session {session_id} is already registered"
        ))
        .into());
    }
    let feed = Arc::new(FeedBuffer::new());
    let presenter: Arc<dyn Presenter> = feed.clone();
    let service = (state.service_factory)(session_id);
    let scheduler = Scheduler::new(
        session_id,
        state.config.clone(),
        roster,
        service,
        presenter,
        Arc::clone(&state.clock),
    );
    state.insert(session_id, SessionEntry { scheduler, feed });

    // Best effort: the session is live whether or not it persists.
    if let Some(store) = &state.store {
        if let Err(error) = store.save(session_id, &request.local_participant) {
            warn!(%session_id, %error, "failed to persist session");
        }
    }

    info!(%session_id, "session created");
    Ok(Json(CreateSessionResponse { session_id }))
}

/// POST /{id}/start
#[instrument(skip(state))]
async fn start_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let entry = state.entry(session_id)?;
    entry.scheduler.start().await?;
    Ok(Json(entry.scheduler.snapshot().await))
}

/// POST /{id}/resume
#[instrument(skip(state))]
async fn resume_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let entry = state.entry(session_id)?;
    entry.scheduler.resume().await?;
    Ok(Json(entry.scheduler.snapshot().await))
}

/// POST /{id}/speech
#[instrument(skip(state, request))]
async fn submit_speech(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SpeechRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let entry = state.entry(session_id)?;
    entry
        .scheduler
        .submit_speech(&request.content, request.queries)
        .await?;
    Ok(Json(entry.scheduler.snapshot().await))
}

/// POST /{id}/answer
#[instrument(skip(state, request))]
async fn submit_answer(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let entry = state.entry(session_id)?;
    entry.scheduler.submit_answer(&request.content).await?;
    Ok(Json(entry.scheduler.snapshot().await))
}

/// GET /{id}/status
#[instrument(skip(state))]
async fn session_status(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let entry = state.entry(session_id)?;
    Ok(Json(entry.scheduler.snapshot().await))
}

/// GET /{id}/feed
#[instrument(skip(state))]
async fn session_feed(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, ApiError> {
    let entry = state.entry(session_id)?;
    let (events, next) = entry.feed.since(query.since);
    Ok(Json(FeedResponse { events, next }))
}

/// Returns the router for the session endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/{id}/start", post(start_session))
        .route("/{id}/resume", post(resume_session))
        .route("/{id}/speech", post(submit_speech))
        .route("/{id}/answer", post(submit_answer))
        .route("/{id}/status", get(session_status))
        .route("/{id}/feed", get(session_feed))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use serde_json::Value;
    use tower::ServiceExt;
    use whodunit_core::clock::Clock;
    use whodunit_core::config::GameConfig;
    use whodunit_core::story::StoryService;
    use whodunit_test_support::{FixedClock, ScriptedStoryService};

    use crate::state::StoryServiceFactory;

    fn test_app_state() -> AppState {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        ));
        let factory: StoryServiceFactory = Arc::new(|_| {
            let service: Arc<dyn StoryService> = Arc::new(ScriptedStoryService::new());
            service
        });
        AppState::new(factory, GameConfig::default(), clock)
    }

    fn create_body() -> Value {
        serde_json::json!({
            "local_participant": "Ada",
            "participants": [
                { "name": "Ada", "is_simulated": false },
                { "name": "Basil", "is_simulated": true }
            ]
        })
    }

    async fn post(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_create_session_returns_200_with_session_id() {
        // Arrange
        let app = router().with_state(test_app_state());

        // Act
        let (status, json) = post(app, "/", &create_body()).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        Uuid::parse_str(json["session_id"].as_str().unwrap()).unwrap();
    }

    #[tokio::test]
    async fn test_create_session_rejects_simulated_local() {
        // Arrange
        let app = router().with_state(test_app_state());
        let body = serde_json::json!({
            "local_participant": "Basil",
            "participants": [
                { "name": "Basil", "is_simulated": true }
            ]
        });

        // Act
        let (status, json) = post(app, "/", &body).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_start_unknown_session_returns_404() {
        // Arrange
        let app = router().with_state(test_app_state());
        let uri = format!("/{}/start", Uuid::new_v4());

        // Act
        let (status, json) = post(app, &uri, &serde_json::json!({})).await;

        // Assert
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "session_not_found");
    }
}
