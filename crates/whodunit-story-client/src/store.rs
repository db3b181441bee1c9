//! Local persistence of the active session.
//!
//! Only identity survives a restart: the session id and the local
//! character name. Position within the game is rehydrated from the story
//! service, never trusted from disk.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use whodunit_core::error::EngineError;

/// What gets written to disk for a running session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// The remote session identifier.
    pub session_id: Uuid,
    /// The character this client controls.
    pub local_participant: String,
}

/// File-backed store for the active session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// A store backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Persists the active session, replacing any previous one.
    ///
    /// # Errors
    ///
    /// `Storage` when the file or its parent directory cannot be written.
    pub fn save(&self, session_id: Uuid, local_participant: &str) -> Result<(), EngineError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| EngineError::Storage(e.to_string()))?;
        }
        let stored = StoredSession {
            session_id,
            local_participant: local_participant.to_owned(),
        };
        let body = serde_json::to_string_pretty(&stored)
            .map_err(|e| EngineError::Storage(e.to_string()))?;
        fs::write(&self.path, body).map_err(|e| EngineError::Storage(e.to_string()))
    }

    /// Loads the persisted session, if one exists.
    ///
    /// # Errors
    ///
    /// `Storage` when the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<StoredSession>, EngineError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let body =
            fs::read_to_string(&self.path).map_err(|e| EngineError::Storage(e.to_string()))?;
        let stored =
            serde_json::from_str(&body).map_err(|e| EngineError::Storage(e.to_string()))?;
        Ok(Some(stored))
    }

    /// Forgets the persisted session. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// `Storage` when the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), EngineError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(EngineError::Storage(e.to_string())),
        }
    }
}
