//! Engine error taxonomy.

use thiserror::Error;
use uuid::Uuid;

/// Top-level error type for the session engine.
///
/// The variants encode the propagation policy: `Network` and
/// `ServiceLogic` failures at a phase-entry point halt automatic
/// progression and are surfaced to the user; a `SimulatedActor` failure
/// mid-cycle degrades to a sentinel message and never blocks the other
/// participants' completion tracking.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A transient transport failure talking to the remote story service.
    #[error("network error: {0}")]
    Network(String),

    /// The remote story service explicitly reported a failure.
    #[error("story service error: {0}")]
    ServiceLogic(String),

    /// One simulated participant's speech or answer failed.
    #[error("simulated participant {participant} failed: {reason}")]
    SimulatedActor {
        /// The simulated participant that failed.
        participant: String,
        /// Why the speech or answer could not be produced.
        reason: String,
    },

    /// A request violated the session rules (wrong phase, unknown actor,
    /// malformed roster).
    #[error("validation error: {0}")]
    Validation(String),

    /// No session exists for the given identifier.
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    /// Reading or writing locally persisted session state failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl EngineError {
    /// True when the error is fatal to automatic phase progression.
    #[must_use]
    pub fn halts_progression(&self) -> bool {
        matches!(self, Self::Network(_) | Self::ServiceLogic(_))
    }
}
