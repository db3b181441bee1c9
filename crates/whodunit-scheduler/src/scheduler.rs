//! The phase/turn state machine.
//!
//! One `Scheduler` drives one session through its chapters. All state
//! lives behind a single async mutex; every entry point, whether a player
//! submission or a deferred task firing, locks it, verifies the phase
//! stamp it was scheduled under, and only then mutates. A stale stamp
//! means the session has already moved on and the event is discarded.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

use whodunit_core::clock::Clock;
use whodunit_core::config::GameConfig;
use whodunit_core::error::EngineError;
use whodunit_core::phase::{Phase, PhaseStamp};
use whodunit_core::presenter::{MessageKind, Presenter};
use whodunit_core::story::{ActionKind, SimulatedSpeech, StoryService};
use whodunit_ledger::{Action, ActionLedger, CANNOT_SPEAK, DECLINES_TO_ANSWER};
use whodunit_roster::Roster;

use crate::session::{Session, SessionView};
use crate::timer::PhaseTimer;
use crate::trackers::{AnswerCompletion, SpeakingCompletion};

const SUMMARY_FALLBACK: &str =
    "The DM pauses, unable to gather the threads of the story for now.";

struct SessionState {
    session: Session,
    ledger: ActionLedger,
    speaking: Option<SpeakingCompletion>,
    answers: Option<AnswerCompletion>,
    timer: PhaseTimer,
}

struct Inner {
    session_id: Uuid,
    config: GameConfig,
    roster: Roster,
    service: Arc<dyn StoryService>,
    presenter: Arc<dyn Presenter>,
    clock: Arc<dyn Clock>,
    state: Mutex<SessionState>,
}

/// Drives one session through DM narration, player speak, player answer
/// and DM summary phases.
///
/// Cheap to clone; every clone shares the same session.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<Inner>,
}

impl Scheduler {
    /// A scheduler for a fresh session in the `Idle` phase.
    #[must_use]
    pub fn new(
        session_id: Uuid,
        config: GameConfig,
        roster: Roster,
        service: Arc<dyn StoryService>,
        presenter: Arc<dyn Presenter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let local = roster.local().name.clone();
        let session = Session::new(session_id, config.total_chapters, local);
        Self {
            inner: Arc::new(Inner {
                session_id,
                config,
                roster,
                service,
                presenter,
                clock,
                state: Mutex::new(SessionState {
                    session,
                    ledger: ActionLedger::new(),
                    speaking: None,
                    answers: None,
                    timer: PhaseTimer::default(),
                }),
            }),
        }
    }

    /// The session this scheduler drives.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.inner.session_id
    }

    /// Starts chapter one of a fresh session.
    ///
    /// # Errors
    ///
    /// `Validation` when the session has already started; the chapter
    /// start's `Network` or `ServiceLogic` error when the story service
    /// fails, in which case the session is halted with a visible error.
    #[instrument(skip(self), fields(session_id = %self.inner.session_id))]
    pub async fn start(&self) -> Result<(), EngineError> {
        let mut state = self.inner.state.lock().await;
        if state.session.phase != Phase::Idle {
            return Err(EngineError::Validation(
                "session has already started".into(),
            ));
        }
        self.begin_chapter(&mut state, 1).await
    }

    /// Rehydrates a session from the story service's view and re-enters
    /// the reported phase.
    ///
    /// Only the `{chapter, cycle, phase}` position is trusted; trackers
    /// and the ledger restart empty, so an in-flight answer phase with no
    /// locally recorded queries falls through its grace delay.
    ///
    /// # Errors
    ///
    /// `Validation` when the session has already started locally, or the
    /// status poll's error when the remote lookup fails.
    #[instrument(skip(self), fields(session_id = %self.inner.session_id))]
    pub async fn resume(&self) -> Result<(), EngineError> {
        let status = self
            .inner
            .service
            .poll_session_status(self.inner.session_id)
            .await?;

        let mut state = self.inner.state.lock().await;
        if state.session.phase != Phase::Idle {
            return Err(EngineError::Validation(
                "session has already started".into(),
            ));
        }

        if status.chapter == 0 || status.phase == Phase::Idle {
            return self.begin_chapter(&mut state, 1).await;
        }

        state.session.chapter = status.chapter;
        state.session.cycle = status.cycle;
        match status.phase {
            Phase::Idle | Phase::DmSpeak => self.enter_cycle_dm_speak(&mut state),
            Phase::PlayerSpeak => self.enter_player_speak(&mut state),
            Phase::PlayerAnswer => self.advance_to_answer(&mut state),
            Phase::DmSummary => self.enter_dm_summary(&mut state).await,
            Phase::Ended => self.finish_game(&mut state),
        }
        Ok(())
    }

    /// Records the local participant's speech for the current cycle.
    ///
    /// `queries` maps queried roster members to question text; the
    /// queried names become required answerers for the following answer
    /// phase. The speech is appended to the ledger and echoed locally
    /// before the remote acknowledgment arrives.
    ///
    /// # Errors
    ///
    /// `Validation` when the session is halted, the phase is not player
    /// speak, the local participant already spoke this cycle, or a query
    /// targets someone outside the roster (or the speaker themself).
    #[instrument(skip(self, content, queries), fields(session_id = %self.inner.session_id))]
    pub async fn submit_speech(
        &self,
        content: &str,
        queries: BTreeMap<String, String>,
    ) -> Result<(), EngineError> {
        let mut state = self.inner.state.lock().await;
        if state.session.halted {
            return Err(EngineError::Validation("session is halted".into()));
        }
        if state.session.phase != Phase::PlayerSpeak {
            return Err(EngineError::Validation(
                "speech is only accepted during the speak phase".into(),
            ));
        }
        let local = state.session.local_participant.clone();
        if state
            .speaking
            .as_ref()
            .is_some_and(|t| t.spoken_names().contains(&local))
        {
            return Err(EngineError::Validation(
                "you have already spoken this round".into(),
            ));
        }
        for target in queries.keys() {
            if *target == local {
                return Err(EngineError::Validation(
                    "you cannot query yourself".into(),
                ));
            }
            if !self.inner.roster.contains(target) {
                return Err(EngineError::Validation(format!(
                    "unknown query target: {target}"
                )));
            }
        }

        let (chapter, cycle) = (state.session.chapter, state.session.cycle);
        let action = Action::speak(
            &local,
            chapter,
            cycle,
            content,
            queries.clone(),
            self.inner.clock.now(),
        );
        state.ledger.append(action);
        self.inner
            .presenter
            .show_player_message(&local, content, MessageKind::Speak);
        self.present_queries(&local, &queries);
        if let Some(tracker) = state.speaking.as_mut() {
            tracker.mark_spoken(&local);
        }

        self.dispatch_submit(&local, content, queries, chapter, cycle, ActionKind::Speak);

        if state.speaking.as_ref().is_some_and(SpeakingCompletion::is_complete) {
            self.advance_to_answer(&mut state);
        }
        Ok(())
    }

    /// Records the local participant's answer to the question they were
    /// asked this cycle.
    ///
    /// # Errors
    ///
    /// `Validation` when the session is halted, the phase is not player
    /// answer, the local participant was not queried, or they already
    /// answered.
    #[instrument(skip(self, content), fields(session_id = %self.inner.session_id))]
    pub async fn submit_answer(&self, content: &str) -> Result<(), EngineError> {
        let mut state = self.inner.state.lock().await;
        if state.session.halted {
            return Err(EngineError::Validation("session is halted".into()));
        }
        if state.session.phase != Phase::PlayerAnswer {
            return Err(EngineError::Validation(
                "answers are only accepted during the answer phase".into(),
            ));
        }
        let local = state.session.local_participant.clone();
        let Some(tracker) = state.answers.as_ref() else {
            return Err(EngineError::Validation(
                "answers are only accepted during the answer phase".into(),
            ));
        };
        if !tracker.requires(&local) {
            return Err(EngineError::Validation(
                "you were not queried this round".into(),
            ));
        }
        if tracker.has_answered(&local) {
            return Err(EngineError::Validation(
                "you have already answered this round".into(),
            ));
        }

        let (chapter, cycle) = (state.session.chapter, state.session.cycle);
        let question = state
            .ledger
            .question_for(chapter, cycle, &local)
            .map(|(_, question)| question)
            .unwrap_or_default();
        let action = Action::answer(
            &local,
            chapter,
            cycle,
            content,
            question,
            self.inner.clock.now(),
        );
        state.ledger.append(action);
        self.inner
            .presenter
            .show_player_message(&local, content, MessageKind::Answer);
        if let Some(tracker) = state.answers.as_mut() {
            tracker.mark_answered(&local);
        }

        self.dispatch_submit(
            &local,
            content,
            BTreeMap::new(),
            chapter,
            cycle,
            ActionKind::Answer,
        );

        if Self::answer_phase_complete(&mut state) {
            self.end_answer_phase(&mut state).await;
        }
        Ok(())
    }

    /// Read-only snapshot for status queries.
    ///
    /// Remaining time is derived from the stored deadline against the
    /// clock at call time.
    pub async fn snapshot(&self) -> SessionView {
        let state = self.inner.state.lock().await;
        let timed = matches!(
            state.session.phase,
            Phase::PlayerSpeak | Phase::PlayerAnswer
        );
        let remaining_secs = if timed {
            state.session.phase_deadline.map(|deadline| {
                let left = (deadline - self.inner.clock.now()).num_seconds();
                u64::try_from(left).unwrap_or(0)
            })
        } else {
            None
        };
        SessionView {
            session_id: state.session.id,
            chapter: state.session.chapter,
            cycle: state.session.cycle,
            phase: state.session.phase,
            remaining_secs,
            halted: state.session.halted,
            spoken: state
                .speaking
                .as_ref()
                .map(|t| t.spoken_names().iter().cloned().collect())
                .unwrap_or_default(),
            awaiting_answer: state
                .answers
                .as_ref()
                .map(AnswerCompletion::outstanding)
                .unwrap_or_default(),
        }
    }

    // ---- deferred entry points -------------------------------------------

    /// True when the deferred event scheduled under `stamp` still refers
    /// to the phase the session occupies.
    fn stamp_matches(state: &SessionState, stamp: PhaseStamp) -> bool {
        !state.session.halted && state.session.stamp() == stamp
    }

    async fn open_speak_phase(&self, stamp: PhaseStamp) {
        let mut state = self.inner.state.lock().await;
        if !Self::stamp_matches(&state, stamp) {
            return;
        }
        self.enter_player_speak(&mut state);
    }

    async fn record_simulated_speech(&self, stamp: PhaseStamp, entry: SimulatedSpeech) {
        let mut state = self.inner.state.lock().await;
        if !Self::stamp_matches(&state, stamp) {
            return;
        }
        if !self.inner.roster.contains(&entry.participant) {
            warn!(participant = %entry.participant, "speech from unknown participant discarded");
            return;
        }

        // A failed entry still counts toward completion, with a sentinel
        // in place of the missing speech.
        let (content, queries) = if entry.success {
            (entry.content, entry.queries)
        } else {
            (CANNOT_SPEAK.to_owned(), BTreeMap::new())
        };

        let (chapter, cycle) = (state.session.chapter, state.session.cycle);
        state.ledger.append(Action::speak(
            &entry.participant,
            chapter,
            cycle,
            &content,
            queries.clone(),
            self.inner.clock.now(),
        ));
        self.inner
            .presenter
            .show_player_message(&entry.participant, &content, MessageKind::Speak);
        self.present_queries(&entry.participant, &queries);
        if let Some(tracker) = state.speaking.as_mut() {
            tracker.mark_spoken(&entry.participant);
        }

        if state.speaking.as_ref().is_some_and(SpeakingCompletion::is_complete) {
            self.advance_to_answer(&mut state);
        }
    }

    async fn record_simulated_answer(
        &self,
        stamp: PhaseStamp,
        participant: String,
        question: String,
        result: Result<String, EngineError>,
    ) {
        let mut state = self.inner.state.lock().await;
        if !Self::stamp_matches(&state, stamp) {
            return;
        }

        // A failed answer becomes a visible refusal; the phase must not
        // wait forever on a participant who can no longer respond.
        let content = match result {
            Ok(answer) => answer,
            Err(error) => {
                warn!(%participant, %error, "simulated answer failed");
                DECLINES_TO_ANSWER.to_owned()
            }
        };

        let (chapter, cycle) = (state.session.chapter, state.session.cycle);
        state.ledger.append(Action::answer(
            &participant,
            chapter,
            cycle,
            &content,
            question,
            self.inner.clock.now(),
        ));
        self.inner
            .presenter
            .show_player_message(&participant, &content, MessageKind::Answer);
        if let Some(tracker) = state.answers.as_mut() {
            tracker.mark_answered(&participant);
            tracker.mark_simulated_completed();
        }

        if Self::answer_phase_complete(&mut state) {
            self.end_answer_phase(&mut state).await;
        }
    }

    async fn countdown_tick(&self, stamp: PhaseStamp, remaining: u64, total: u64) {
        let state = self.inner.state.lock().await;
        if !Self::stamp_matches(&state, stamp) {
            return;
        }
        self.inner.presenter.show_countdown(remaining, total);
    }

    async fn phase_timed_out(&self, stamp: PhaseStamp) {
        let mut state = self.inner.state.lock().await;
        if !Self::stamp_matches(&state, stamp) {
            return;
        }
        match state.session.phase {
            Phase::PlayerSpeak => {
                // Everyone who never spoke is recorded as keeping silent,
                // so the ledger stays complete for the transcript.
                let spoken = state
                    .speaking
                    .as_ref()
                    .map(|t| t.spoken_names().clone())
                    .unwrap_or_default();
                let (chapter, cycle) = (state.session.chapter, state.session.cycle);
                let silent: Vec<String> = self
                    .inner
                    .roster
                    .iter()
                    .filter(|p| !spoken.contains(&p.name))
                    .map(|p| p.name.clone())
                    .collect();
                for name in silent {
                    state.ledger.append(Action::kept_silence(
                        &name,
                        chapter,
                        cycle,
                        self.inner.clock.now(),
                    ));
                    self.inner.presenter.show_player_message(
                        &name,
                        whodunit_ledger::KEPT_SILENCE,
                        MessageKind::Speak,
                    );
                    if let Some(tracker) = state.speaking.as_mut() {
                        tracker.mark_spoken(&name);
                    }
                }
                self.inner
                    .presenter
                    .show_system_message("Time is up. Moving to the answer phase.");
                self.advance_to_answer(&mut state);
            }
            Phase::PlayerAnswer => {
                self.inner
                    .presenter
                    .show_system_message("Time is up for answers.");
                self.end_answer_phase(&mut state).await;
            }
            _ => {}
        }
    }

    async fn finish_answer_grace(&self, stamp: PhaseStamp) {
        let mut state = self.inner.state.lock().await;
        if !Self::stamp_matches(&state, stamp) {
            return;
        }
        self.end_answer_phase(&mut state).await;
    }

    async fn advance_past_summary(&self, stamp: PhaseStamp) {
        let mut state = self.inner.state.lock().await;
        if !Self::stamp_matches(&state, stamp) {
            return;
        }
        if state.session.chapter >= state.session.chapter_count {
            self.finish_game(&mut state);
        } else {
            let next = state.session.chapter + 1;
            if let Err(error) = self.begin_chapter(&mut state, next).await {
                debug!(%error, "automatic chapter advance failed");
            }
        }
    }

    // ---- phase transitions -----------------------------------------------

    async fn begin_chapter(
        &self,
        state: &mut SessionState,
        chapter: u32,
    ) -> Result<(), EngineError> {
        state.timer.stop();
        state.session.chapter = chapter;
        state.session.cycle = 1;
        state.session.phase = Phase::DmSpeak;
        state.session.phase_deadline = None;
        state.speaking = None;
        state.answers = None;
        self.inner.presenter.show_phase(Phase::DmSpeak, chapter, 1);

        let local = state.session.local_participant.clone();
        match self.inner.service.start_chapter(chapter, &local).await {
            Ok(opening) => {
                self.inner.presenter.show_dm_message(&opening.dm_narration);
                for asset in &opening.chapter_assets {
                    self.inner
                        .presenter
                        .show_system_message(&format!("New material unlocked: {asset}"));
                }
                self.schedule_dm_delay(state);
                Ok(())
            }
            Err(error) => {
                self.halt(state, &error);
                Err(error)
            }
        }
    }

    /// Canned mid-chapter DM beat between cycles; the story service is
    /// only consulted at chapter boundaries.
    fn enter_cycle_dm_speak(&self, state: &mut SessionState) {
        state.timer.stop();
        state.session.phase = Phase::DmSpeak;
        state.session.phase_deadline = None;
        state.speaking = None;
        state.answers = None;
        let (chapter, cycle) = (state.session.chapter, state.session.cycle);
        self.inner.presenter.show_phase(Phase::DmSpeak, chapter, cycle);
        self.inner.presenter.show_dm_message(&format!(
            "Chapter {chapter}, round {cycle} begins. Observe carefully and choose your questions well."
        ));
        self.schedule_dm_delay(state);
    }

    fn schedule_dm_delay(&self, state: &mut SessionState) {
        let stamp = state.session.stamp();
        let delay = self.inner.config.dm_speak_delay;
        let scheduler = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            scheduler.open_speak_phase(stamp).await;
        });
    }

    fn enter_player_speak(&self, state: &mut SessionState) {
        state.session.phase = Phase::PlayerSpeak;
        state.speaking = Some(SpeakingCompletion::new(self.inner.roster.len()));
        state.answers = None;
        let (chapter, cycle) = (state.session.chapter, state.session.cycle);
        self.inner
            .presenter
            .show_phase(Phase::PlayerSpeak, chapter, cycle);

        let stamp = state.session.stamp();
        self.start_countdown(state, self.inner.config.speak_timeout, stamp);

        let scheduler = self.clone();
        let stagger = self.inner.config.simulated_stagger;
        tokio::spawn(async move {
            match scheduler
                .inner
                .service
                .request_all_simulated_speech(chapter)
                .await
            {
                Ok(entries) => {
                    for entry in entries {
                        tokio::time::sleep(stagger).await;
                        scheduler.record_simulated_speech(stamp, entry).await;
                    }
                }
                Err(error) => {
                    // The phase still times out normally; silent members
                    // get sentinels then.
                    warn!(%error, "simulated speech batch failed");
                    scheduler
                        .inner
                        .presenter
                        .show_error(&format!("simulated speech unavailable: {error}"));
                }
            }
        });
    }

    fn advance_to_answer(&self, state: &mut SessionState) {
        state.timer.stop();
        state.session.phase = Phase::PlayerAnswer;
        state.session.phase_deadline = None;
        state.speaking = None;
        let (chapter, cycle) = (state.session.chapter, state.session.cycle);
        self.inner
            .presenter
            .show_phase(Phase::PlayerAnswer, chapter, cycle);

        let required = state.ledger.queried_names(chapter, cycle);
        let sim_targets: Vec<(String, String, String)> = required
            .iter()
            .filter(|name| {
                self.inner
                    .roster
                    .get(name)
                    .is_some_and(|p| p.is_simulated)
            })
            .filter_map(|name| {
                state
                    .ledger
                    .question_for(chapter, cycle, name)
                    .map(|(asker, question)| (name.clone(), question, asker))
            })
            .collect();

        let mut tracker = AnswerCompletion::new(required);
        tracker.set_pending_simulated(sim_targets.len());
        let vacuous = tracker.is_vacuous();
        state.answers = Some(tracker);
        let stamp = state.session.stamp();

        if vacuous {
            // Nobody was queried; pause briefly so the phase is visible,
            // then move on.
            self.inner
                .presenter
                .show_system_message("No one was questioned this round.");
            let scheduler = self.clone();
            let grace = self.inner.config.answer_grace;
            tokio::spawn(async move {
                tokio::time::sleep(grace).await;
                scheduler.finish_answer_grace(stamp).await;
            });
            return;
        }

        self.start_countdown(state, self.inner.config.answer_timeout, stamp);

        let scheduler = self.clone();
        let stagger = self.inner.config.simulated_stagger;
        tokio::spawn(async move {
            for (participant, question, asker) in sim_targets {
                tokio::time::sleep(stagger).await;
                let result = scheduler
                    .inner
                    .service
                    .request_simulated_answer(&participant, &question, &asker, chapter)
                    .await
                    .map(|a| a.answer);
                scheduler
                    .record_simulated_answer(stamp, participant, question, result)
                    .await;
            }
        });
    }

    async fn end_answer_phase(&self, state: &mut SessionState) {
        state.timer.stop();
        state.session.phase_deadline = None;
        state.answers = None;
        if state.session.cycle < self.inner.config.cycles_per_chapter {
            state.session.cycle += 1;
            self.enter_cycle_dm_speak(state);
        } else {
            self.enter_dm_summary(state).await;
        }
    }

    async fn enter_dm_summary(&self, state: &mut SessionState) {
        state.timer.stop();
        state.session.phase = Phase::DmSummary;
        state.session.phase_deadline = None;
        let (chapter, cycle) = (state.session.chapter, state.session.cycle);
        self.inner
            .presenter
            .show_phase(Phase::DmSummary, chapter, cycle);

        let final_chapter = chapter >= state.session.chapter_count;
        let transcript = state.ledger.transcript();
        match self
            .inner
            .service
            .chapter_summary(chapter, &transcript, final_chapter)
            .await
        {
            Ok(summary) => {
                self.inner.presenter.show_dm_message(&summary);
                let stamp = state.session.stamp();
                let delay = self.inner.config.summary_delay;
                let scheduler = self.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    scheduler.advance_past_summary(stamp).await;
                });
            }
            Err(error) => {
                self.inner.presenter.show_dm_message(SUMMARY_FALLBACK);
                self.halt(state, &error);
            }
        }
    }

    fn finish_game(&self, state: &mut SessionState) {
        state.timer.stop();
        state.session.phase = Phase::Ended;
        state.session.phase_deadline = None;
        state.speaking = None;
        state.answers = None;
        let (chapter, cycle) = (state.session.chapter, state.session.cycle);
        self.inner.presenter.show_phase(Phase::Ended, chapter, cycle);
        self.inner
            .presenter
            .show_system_message("The game has ended. Thanks for playing.");
    }

    fn halt(&self, state: &mut SessionState, cause: &EngineError) {
        state.session.halted = true;
        state.timer.stop();
        state.session.phase_deadline = None;
        error!(error = %cause, "automatic progression halted");
        self.inner
            .presenter
            .show_error(&format!("the story service failed: {cause}"));
    }

    // ---- helpers ---------------------------------------------------------

    fn start_countdown(&self, state: &mut SessionState, total: Duration, stamp: PhaseStamp) {
        state.session.phase_deadline = Some(
            self.inner.clock.now()
                + chrono::Duration::from_std(total).unwrap_or(chrono::Duration::MAX),
        );
        let total_secs = total.as_secs();
        let scheduler = self.clone();
        let handle = tokio::spawn(async move {
            let mut remaining = total_secs;
            while remaining > 0 {
                tokio::time::sleep(Duration::from_secs(1)).await;
                remaining -= 1;
                scheduler.countdown_tick(stamp, remaining, total_secs).await;
            }
            // Detached so aborting this countdown during the transition
            // cannot cancel the transition itself.
            tokio::spawn(async move {
                scheduler.phase_timed_out(stamp).await;
            });
        });
        state.timer.arm(handle);
    }

    /// Ledger-authoritative completion check for the answer phase. The
    /// required set is re-derived on every check because simulated speech
    /// can record new queries after the phase opened.
    fn answer_phase_complete(state: &mut SessionState) -> bool {
        let (chapter, cycle) = (state.session.chapter, state.session.cycle);
        let Some(tracker) = state.answers.as_mut() else {
            return false;
        };
        tracker.recompute_required(&state.ledger, chapter, cycle);
        tracker.refresh_answered(&state.ledger, chapter, cycle);
        tracker.is_complete()
    }

    fn present_queries(&self, speaker: &str, queries: &BTreeMap<String, String>) {
        for (target, question) in queries {
            self.inner.presenter.show_player_message(
                speaker,
                &format!("asks {target}: {question}"),
                MessageKind::Query,
            );
        }
    }

    /// Sends a recorded action to the story service without blocking the
    /// phase: the local ledger is authoritative and a failed
    /// acknowledgment only gets logged.
    fn dispatch_submit(
        &self,
        participant: &str,
        content: &str,
        queries: BTreeMap<String, String>,
        chapter: u32,
        cycle: u32,
        kind: ActionKind,
    ) {
        let scheduler = self.clone();
        let participant = participant.to_owned();
        let content = content.to_owned();
        tokio::spawn(async move {
            if let Err(error) = scheduler
                .inner
                .service
                .submit_action(
                    scheduler.inner.session_id,
                    &participant,
                    &content,
                    &queries,
                    chapter,
                    cycle,
                    kind,
                )
                .await
            {
                warn!(%participant, %error, "action submission failed");
            }
        });
    }
}
