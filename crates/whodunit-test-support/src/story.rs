//! Test story services — scripted and failing `StoryService` mocks.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;
use whodunit_core::error::EngineError;
use whodunit_core::phase::Phase;
use whodunit_core::story::{
    ActionKind, ChapterOpening, SessionStatus, SimulatedAnswer, SimulatedSpeech, StoryService,
};

/// One action recorded through `submit_action`.
#[derive(Debug, Clone)]
pub struct SubmittedAction {
    /// Session the action belongs to.
    pub session_id: Uuid,
    /// The acting participant.
    pub participant: String,
    /// What was said.
    pub content: String,
    /// Targeted queries, if any.
    pub queries: BTreeMap<String, String>,
    /// Chapter/cycle scope.
    pub chapter: u32,
    /// Cycle within the chapter.
    pub cycle: u32,
    /// Speak or answer.
    pub kind: ActionKind,
}

/// A story service that returns scripted content and records every call.
///
/// Defaults to canned narration, an empty simulated-speech batch, and a
/// generic answer for every participant; builder methods override each
/// behavior per test.
#[derive(Debug, Default)]
pub struct ScriptedStoryService {
    speeches: Vec<SimulatedSpeech>,
    answers: HashMap<String, String>,
    failing_answerers: HashSet<String>,
    fail_chapter_start: bool,
    fail_summary: bool,
    fail_speech_batch: bool,
    status: Option<SessionStatus>,
    submitted: Mutex<Vec<SubmittedAction>>,
    summary_requests: Mutex<Vec<(u32, bool)>>,
}

impl ScriptedStoryService {
    /// A service with all-default behavior.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the simulated-speech batch returned for every cycle.
    #[must_use]
    pub fn with_speeches(mut self, speeches: Vec<SimulatedSpeech>) -> Self {
        self.speeches = speeches;
        self
    }

    /// Scripts one participant's answer text.
    #[must_use]
    pub fn with_answer(mut self, participant: &str, answer: &str) -> Self {
        self.answers
            .insert(participant.to_owned(), answer.to_owned());
        self
    }

    /// Makes one participant's answer request fail.
    #[must_use]
    pub fn with_failing_answerer(mut self, participant: &str) -> Self {
        self.failing_answerers.insert(participant.to_owned());
        self
    }

    /// Makes `start_chapter` fail with a `ServiceLogic` error.
    #[must_use]
    pub fn with_failing_chapter_start(mut self) -> Self {
        self.fail_chapter_start = true;
        self
    }

    /// Makes `chapter_summary` fail with a `ServiceLogic` error.
    #[must_use]
    pub fn with_failing_summary(mut self) -> Self {
        self.fail_summary = true;
        self
    }

    /// Makes the whole simulated-speech batch request fail.
    #[must_use]
    pub fn with_failing_speech_batch(mut self) -> Self {
        self.fail_speech_batch = true;
        self
    }

    /// Sets the status returned by `poll_session_status`.
    #[must_use]
    pub fn with_status(mut self, status: SessionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Snapshot of every action submitted so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn submitted_actions(&self) -> Vec<SubmittedAction> {
        self.submitted.lock().unwrap().clone()
    }

    /// `(chapter, final_chapter)` pairs of every summary request.
    #[must_use]
    pub fn summary_requests(&self) -> Vec<(u32, bool)> {
        self.summary_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StoryService for ScriptedStoryService {
    async fn start_chapter(
        &self,
        chapter: u32,
        _local_participant: &str,
    ) -> Result<ChapterOpening, EngineError> {
        if self.fail_chapter_start {
            return Err(EngineError::ServiceLogic(
                "chapter generation failed".into(),
            ));
        }
        Ok(ChapterOpening {
            dm_narration: format!("Chapter {chapter} opens."),
            chapter_assets: Vec::new(),
        })
    }

    async fn request_all_simulated_speech(
        &self,
        _chapter: u32,
    ) -> Result<Vec<SimulatedSpeech>, EngineError> {
        if self.fail_speech_batch {
            return Err(EngineError::Network("connection refused".into()));
        }
        Ok(self.speeches.clone())
    }

    async fn request_simulated_answer(
        &self,
        participant: &str,
        _question: &str,
        _asker: &str,
        _chapter: u32,
    ) -> Result<SimulatedAnswer, EngineError> {
        if self.failing_answerers.contains(participant) {
            return Err(EngineError::SimulatedActor {
                participant: participant.to_owned(),
                reason: "generation failed".into(),
            });
        }
        let answer = self
            .answers
            .get(participant)
            .cloned()
            .unwrap_or_else(|| format!("{participant} gives a vague answer."));
        Ok(SimulatedAnswer { answer })
    }

    async fn submit_action(
        &self,
        session_id: Uuid,
        participant: &str,
        content: &str,
        queries: &BTreeMap<String, String>,
        chapter: u32,
        cycle: u32,
        kind: ActionKind,
    ) -> Result<(), EngineError> {
        self.submitted.lock().unwrap().push(SubmittedAction {
            session_id,
            participant: participant.to_owned(),
            content: content.to_owned(),
            queries: queries.clone(),
            chapter,
            cycle,
            kind,
        });
        Ok(())
    }

    async fn chapter_summary(
        &self,
        chapter: u32,
        _transcript: &str,
        final_chapter: bool,
    ) -> Result<String, EngineError> {
        self.summary_requests
            .lock()
            .unwrap()
            .push((chapter, final_chapter));
        if self.fail_summary {
            return Err(EngineError::ServiceLogic("summary generation failed".into()));
        }
        if final_chapter {
            Ok("The truth is revealed.".to_owned())
        } else {
            Ok(format!("Chapter {chapter} draws to a close."))
        }
    }

    async fn poll_session_status(&self, session_id: Uuid) -> Result<SessionStatus, EngineError> {
        self.status
            .clone()
            .ok_or(EngineError::SessionNotFound(session_id))
    }
}

/// A story service that fails every call with a `Network` error.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStoryService;

#[async_trait]
impl StoryService for FailingStoryService {
    async fn start_chapter(
        &self,
        _chapter: u32,
        _local_participant: &str,
    ) -> Result<ChapterOpening, EngineError> {
        Err(EngineError::Network("connection refused".into()))
    }

    async fn request_all_simulated_speech(
        &self,
        _chapter: u32,
    ) -> Result<Vec<SimulatedSpeech>, EngineError> {
        Err(EngineError::Network("connection refused".into()))
    }

    async fn request_simulated_answer(
        &self,
        _participant: &str,
        _question: &str,
        _asker: &str,
        _chapter: u32,
    ) -> Result<SimulatedAnswer, EngineError> {
        Err(EngineError::Network("connection refused".into()))
    }

    async fn submit_action(
        &self,
        _session_id: Uuid,
        _participant: &str,
        _content: &str,
        _queries: &BTreeMap<String, String>,
        _chapter: u32,
        _cycle: u32,
        _kind: ActionKind,
    ) -> Result<(), EngineError> {
        Err(EngineError::Network("connection refused".into()))
    }

    async fn chapter_summary(
        &self,
        _chapter: u32,
        _transcript: &str,
        _final_chapter: bool,
    ) -> Result<String, EngineError> {
        Err(EngineError::Network("connection refused".into()))
    }

    async fn poll_session_status(&self, _session_id: Uuid) -> Result<SessionStatus, EngineError> {
        Err(EngineError::Network("connection refused".into()))
    }
}

/// Convenience constructor for a status snapshot.
#[must_use]
pub fn session_status(chapter: u32, cycle: u32, phase: Phase) -> SessionStatus {
    SessionStatus {
        chapter,
        cycle,
        phase,
        roster: Vec::new(),
    }
}
