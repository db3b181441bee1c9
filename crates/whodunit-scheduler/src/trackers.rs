//! Per-phase completion trackers.
//!
//! Both trackers are created at phase entry and discarded at phase exit.
//! The answer tracker re-derives its required set from the ledger on every
//! check: simulated speech may be recorded after the union was first
//! computed, so the ledger is authoritative over any cached set.

use std::collections::BTreeSet;

use whodunit_ledger::ActionLedger;

/// Tracks who has spoken during the player-speak phase.
#[derive(Debug)]
pub struct SpeakingCompletion {
    expected_count: usize,
    spoken: BTreeSet<String>,
}

impl SpeakingCompletion {
    /// A tracker expecting every roster member to speak.
    #[must_use]
    pub fn new(expected_count: usize) -> Self {
        Self {
            expected_count,
            spoken: BTreeSet::new(),
        }
    }

    /// Marks a participant as having spoken. Idempotent.
    pub fn mark_spoken(&mut self, name: &str) {
        self.spoken.insert(name.to_owned());
    }

    /// True once everyone expected has spoken.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.spoken.len() >= self.expected_count
    }

    /// Names marked so far.
    #[must_use]
    pub fn spoken_names(&self) -> &BTreeSet<String> {
        &self.spoken
    }
}

/// Tracks who owes an answer during the player-answer phase.
///
/// Complete only when every required name has answered *and* every
/// in-flight simulated answer has finished (success or failure).
#[derive(Debug)]
pub struct AnswerCompletion {
    required: BTreeSet<String>,
    answered: BTreeSet<String>,
    pending_simulated: usize,
    completed_simulated: usize,
}

impl AnswerCompletion {
    /// A tracker for the given required set.
    #[must_use]
    pub fn new(required: BTreeSet<String>) -> Self {
        Self {
            required,
            answered: BTreeSet::new(),
            pending_simulated: 0,
            completed_simulated: 0,
        }
    }

    /// Re-derives the required set from the ledger for this cycle.
    pub fn recompute_required(&mut self, ledger: &ActionLedger, chapter: u32, cycle: u32) {
        self.required = ledger.queried_names(chapter, cycle);
    }

    /// Folds the ledger's recorded answers into the answered set.
    pub fn refresh_answered(&mut self, ledger: &ActionLedger, chapter: u32, cycle: u32) {
        self.answered.extend(ledger.answered_names(chapter, cycle));
    }

    /// Declares how many simulated answers were dispatched.
    pub fn set_pending_simulated(&mut self, count: usize) {
        self.pending_simulated = count;
    }

    /// Marks a participant as having answered. Idempotent.
    pub fn mark_answered(&mut self, name: &str) {
        self.answered.insert(name.to_owned());
    }

    /// Records the completion of one simulated answer, successful or not.
    pub fn mark_simulated_completed(&mut self) {
        self.completed_simulated += 1;
    }

    /// True when nobody was queried this cycle.
    #[must_use]
    pub fn is_vacuous(&self) -> bool {
        self.required.is_empty()
    }

    /// Names in the required set.
    #[must_use]
    pub fn required_names(&self) -> &BTreeSet<String> {
        &self.required
    }

    /// True when `name` owes an answer.
    #[must_use]
    pub fn requires(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    /// True when `name` has already answered.
    #[must_use]
    pub fn has_answered(&self, name: &str) -> bool {
        self.answered.contains(name)
    }

    /// Required names that have not answered yet.
    #[must_use]
    pub fn outstanding(&self) -> Vec<String> {
        self.required.difference(&self.answered).cloned().collect()
    }

    /// The phase-exit invariant: `answered ⊇ required` and every
    /// dispatched simulated answer has finished.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.required.is_subset(&self.answered)
            && self.completed_simulated >= self.pending_simulated
    }
}
