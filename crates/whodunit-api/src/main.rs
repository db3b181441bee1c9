//! Whodunit API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use whodunit_api::error::AppError;
use whodunit_api::routes;
use whodunit_api::state::{AppState, StoryServiceFactory};
use whodunit_core::clock::SystemClock;
use whodunit_core::config::GameConfig;
use whodunit_core::story::StoryService;
use whodunit_story_client::{HttpStoryService, SessionStore};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Whodunit API server");

    // Read configuration from environment.
    let story_url = std::env::var("STORY_SERVICE_URL")
        .map_err(|_| AppError::Config("STORY_SERVICE_URL must be set".into()))?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
    let config = GameConfig::from_env();
    let store_path = std::env::var("SESSION_STORE_PATH")
        .unwrap_or_else(|_| "whodunit-session.json".to_string());

    // Build application state.
    let factory: StoryServiceFactory = Arc::new(move |session_id| {
        let service: Arc<dyn StoryService> =
            Arc::new(HttpStoryService::new(&story_url, session_id));
        service
    });
    let store = Arc::new(SessionStore::new(&store_path));
    if let Ok(Some(stored)) = store.load() {
        tracing::info!(
            session_id = %stored.session_id,
            "found a persisted session; recreate it with this id and resume"
        );
    }
    let app_state = AppState::new(factory, config, Arc::new(SystemClock)).with_store(store);

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/sessions", routes::session::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
