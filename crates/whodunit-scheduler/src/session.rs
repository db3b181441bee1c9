//! Session state owned by the scheduler.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use whodunit_core::phase::{Phase, PhaseStamp};

/// Mutable state of one game session.
///
/// Owned exclusively by the `Scheduler` and mutated only through its
/// phase-transition operations.
#[derive(Debug)]
pub struct Session {
    /// Session identifier.
    pub id: Uuid,
    /// Total chapters configured for this session.
    pub chapter_count: u32,
    /// 1-based current chapter; 0 before the first chapter starts.
    pub chapter: u32,
    /// 1-based current cycle within the chapter.
    pub cycle: u32,
    /// Current phase.
    pub phase: Phase,
    /// Absolute deadline of the active countdown, if one is running.
    pub phase_deadline: Option<DateTime<Utc>>,
    /// Name of the participant controlled by this client.
    pub local_participant: String,
    /// Set when a phase-entry service failure stopped automatic
    /// progression.
    pub halted: bool,
}

impl Session {
    /// A fresh, not-yet-started session.
    #[must_use]
    pub fn new(id: Uuid, chapter_count: u32, local_participant: impl Into<String>) -> Self {
        Self {
            id,
            chapter_count,
            chapter: 0,
            cycle: 1,
            phase: Phase::Idle,
            phase_deadline: None,
            local_participant: local_participant.into(),
            halted: false,
        }
    }

    /// The stamp identifying the current phase occupancy.
    #[must_use]
    pub fn stamp(&self) -> PhaseStamp {
        PhaseStamp {
            chapter: self.chapter,
            cycle: self.cycle,
            phase: self.phase,
        }
    }
}

/// Read-only view of a session for status queries.
///
/// Remaining time is derived from the stored deadline at read time, never
/// tracked separately.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    /// Session identifier.
    pub session_id: Uuid,
    /// 1-based current chapter; 0 before the first chapter starts.
    pub chapter: u32,
    /// 1-based current cycle.
    pub cycle: u32,
    /// Current phase.
    pub phase: Phase,
    /// Seconds left on the active countdown, if one is running.
    pub remaining_secs: Option<u64>,
    /// Whether automatic progression has halted on a service failure.
    pub halted: bool,
    /// Who has spoken this cycle (speak phase only).
    pub spoken: Vec<String>,
    /// Who still owes an answer this cycle (answer phase only).
    pub awaiting_answer: Vec<String>,
}
