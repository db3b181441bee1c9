//! Remote story/session service contract.
//!
//! The story service is an external collaborator: it produces DM
//! narration, simulated-participant speech and answers, and persists
//! session state. The engine only ever talks to it through this trait, so
//! tests substitute a scripted implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::phase::Phase;

/// Kind of a recorded participant action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// A public statement during the speak phase, optionally carrying
    /// targeted queries.
    Speak,
    /// A reply to a query, during the answer phase.
    Answer,
}

/// Wire descriptor for one roster member, as the story service reports it.
///
/// This is the loose shape that gets normalized into a
/// `Participant` exactly once, at the roster-loading boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantSpec {
    /// Character name, unique within the session.
    pub name: String,
    /// True when the character is driven by the story service.
    pub is_simulated: bool,
}

/// DM narration and assets returned when a chapter starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterOpening {
    /// The DM's opening narration for the chapter.
    pub dm_narration: String,
    /// Asset references (clue images, handouts) unlocked by the chapter.
    #[serde(default)]
    pub chapter_assets: Vec<String>,
}

/// One simulated participant's speech for the current cycle.
///
/// The batch call is best-effort: a failed entry arrives with
/// `success == false` and must still be accounted for in completion
/// tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedSpeech {
    /// The speaking participant.
    pub participant: String,
    /// What was said (or a failure notice when `success` is false).
    pub content: String,
    /// Targeted questions: queried participant name → question text.
    #[serde(default)]
    pub queries: BTreeMap<String, String>,
    /// Whether generation succeeded for this participant.
    pub success: bool,
}

/// A simulated participant's answer to one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedAnswer {
    /// The answer text.
    pub answer: String,
}

/// Remote view of a session, used only to rehydrate state at resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    /// 1-based current chapter (0 when not started).
    pub chapter: u32,
    /// 1-based current cycle within the chapter.
    pub cycle: u32,
    /// Current phase.
    pub phase: Phase,
    /// Roster as the service knows it.
    #[serde(default)]
    pub roster: Vec<ParticipantSpec>,
}

/// Contract for the remote story/session service.
#[async_trait]
pub trait StoryService: Send + Sync {
    /// Starts a chapter and returns the DM's opening narration.
    ///
    /// # Errors
    ///
    /// `Network` on transport failure, `ServiceLogic` when the remote
    /// reports that generation failed. Either halts automatic progression.
    async fn start_chapter(
        &self,
        chapter: u32,
        local_participant: &str,
    ) -> Result<ChapterOpening, EngineError>;

    /// Requests speech for every simulated participant this cycle.
    ///
    /// Best-effort: individual entries may carry `success == false`.
    ///
    /// # Errors
    ///
    /// `Network` or `ServiceLogic` when the batch request itself fails.
    async fn request_all_simulated_speech(
        &self,
        chapter: u32,
    ) -> Result<Vec<SimulatedSpeech>, EngineError>;

    /// Requests one simulated participant's answer to a question.
    ///
    /// # Errors
    ///
    /// `Network`, `ServiceLogic`, or `SimulatedActor`; the caller
    /// substitutes a declines-to-answer sentinel and still marks the
    /// tracker complete.
    async fn request_simulated_answer(
        &self,
        participant: &str,
        question: &str,
        asker: &str,
        chapter: u32,
    ) -> Result<SimulatedAnswer, EngineError>;

    /// Records a local participant action with the remote service.
    ///
    /// Fire-and-forget from the scheduler's perspective: the local ledger
    /// append happens regardless of this acknowledgment.
    ///
    /// # Errors
    ///
    /// `Network` or `ServiceLogic`; callers log and continue.
    #[allow(clippy::too_many_arguments)]
    async fn submit_action(
        &self,
        session_id: Uuid,
        participant: &str,
        content: &str,
        queries: &BTreeMap<String, String>,
        chapter: u32,
        cycle: u32,
        kind: ActionKind,
    ) -> Result<(), EngineError>;

    /// Generates the DM summary for a chapter from the session transcript.
    ///
    /// `final_chapter` selects the end-of-game reveal instead of a
    /// chapter recap.
    ///
    /// # Errors
    ///
    /// `Network` or `ServiceLogic`; either halts automatic progression.
    async fn chapter_summary(
        &self,
        chapter: u32,
        transcript: &str,
        final_chapter: bool,
    ) -> Result<String, EngineError>;

    /// Fetches the remote session state, used only at session resume.
    ///
    /// # Errors
    ///
    /// `Network` or `ServiceLogic`.
    async fn poll_session_status(&self, session_id: Uuid) -> Result<SessionStatus, EngineError>;
}
