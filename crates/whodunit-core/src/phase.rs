//! Phase vocabulary and the stamp guard for deferred callbacks.

use serde::{Deserialize, Serialize};

/// The strict phase sequence of a session.
///
/// `DmSpeak → PlayerSpeak → PlayerAnswer` repeats once per cycle; after the
/// last cycle of a chapter the session passes through `DmSummary` and either
/// loops to the next chapter's `DmSpeak` or terminates in `Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Session created, first chapter not yet started.
    Idle,
    /// The DM is narrating.
    DmSpeak,
    /// Every participant speaks and may query others.
    PlayerSpeak,
    /// Queried participants answer.
    PlayerAnswer,
    /// The DM summarizes the chapter (or the whole game).
    DmSummary,
    /// Terminal state.
    Ended,
}

impl Phase {
    /// True for the terminal state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ended)
    }
}

/// Identity of one phase occupancy: chapter, cycle, and phase.
///
/// Every deferred callback (countdown expiry, staggered simulated action,
/// fixed delay) captures the stamp of the phase that scheduled it and is
/// discarded if the session has moved on by the time it runs. This is the
/// guard that keeps a late timeout from firing into a later phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseStamp {
    /// 1-based chapter number (0 before the first chapter).
    pub chapter: u32,
    /// 1-based cycle number within the chapter.
    pub cycle: u32,
    /// The occupied phase.
    pub phase: Phase,
}
