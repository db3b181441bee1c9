//! Shared application state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;
use whodunit_core::clock::Clock;
use whodunit_core::config::GameConfig;
use whodunit_core::error::EngineError;
use whodunit_core::story::StoryService;
use whodunit_scheduler::Scheduler;
use whodunit_story_client::SessionStore;

use crate::feed::FeedBuffer;

/// Builds a story service bound to one session id.
///
/// Sessions each talk to the remote under their own id, so the state
/// holds a factory rather than a single client.
pub type StoryServiceFactory = Arc<dyn Fn(Uuid) -> Arc<dyn StoryService> + Send + Sync>;

/// One live session: its scheduler and the feed it renders into.
#[derive(Clone)]
pub struct SessionEntry {
    /// The scheduler driving the session.
    pub scheduler: Scheduler,
    /// Display events buffered for feed polling.
    pub feed: Arc<FeedBuffer>,
}

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Live sessions by id.
    pub sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
    /// Builds the story service for a new session.
    pub service_factory: StoryServiceFactory,
    /// Timing and pacing configuration applied to new sessions.
    pub config: GameConfig,
    /// Clock handed to new schedulers.
    pub clock: Arc<dyn Clock>,
    /// Where the active session is persisted across restarts, if anywhere.
    pub store: Option<Arc<SessionStore>>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        service_factory: StoryServiceFactory,
        config: GameConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            service_factory,
            config,
            clock,
            store: None,
        }
    }

    /// Attaches a store that persists the active session across restarts.
    #[must_use]
    pub fn with_store(mut self, store: Arc<SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Registers a new live session.
    pub fn insert(&self, session_id: Uuid, entry: SessionEntry) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session_id, entry);
    }

    /// Looks up a live session.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` when no session with this id is registered.
    pub fn entry(&self, session_id: Uuid) -> Result<SessionEntry, EngineError> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&session_id)
            .cloned()
            .ok_or(EngineError::SessionNotFound(session_id))
    }
}
