//! Test presenters — recording and no-op `Presenter` implementations.

use std::sync::Mutex;

use whodunit_core::phase::Phase;
use whodunit_core::presenter::{MessageKind, Presenter};

/// One display event pushed by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterEvent {
    /// A phase transition was shown.
    Phase(Phase, u32, u32),
    /// DM narration or summary.
    Dm(String),
    /// A participant message.
    Player {
        /// Who spoke.
        speaker: String,
        /// What was shown.
        content: String,
        /// How it was rendered.
        kind: MessageKind,
    },
    /// An engine notice.
    System(String),
    /// A countdown tick.
    Countdown(u64, u64),
    /// A user-visible error.
    Error(String),
}

/// A presenter that records every display event for later assertions.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    events: Mutex<Vec<PresenterEvent>>,
}

impl RecordingPresenter {
    /// A presenter with no recorded events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded event, in display order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn events(&self) -> Vec<PresenterEvent> {
        self.events.lock().unwrap().clone()
    }

    /// The phase transitions shown, in order.
    #[must_use]
    pub fn phases(&self) -> Vec<(Phase, u32, u32)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PresenterEvent::Phase(phase, chapter, cycle) => Some((phase, chapter, cycle)),
                _ => None,
            })
            .collect()
    }

    /// `(speaker, content)` pairs of every player message shown.
    #[must_use]
    pub fn player_messages(&self) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PresenterEvent::Player {
                    speaker, content, ..
                } => Some((speaker, content)),
                _ => None,
            })
            .collect()
    }

    /// Every user-visible error shown.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PresenterEvent::Error(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: PresenterEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Presenter for RecordingPresenter {
    fn show_phase(&self, phase: Phase, chapter: u32, cycle: u32) {
        self.push(PresenterEvent::Phase(phase, chapter, cycle));
    }

    fn show_dm_message(&self, content: &str) {
        self.push(PresenterEvent::Dm(content.to_owned()));
    }

    fn show_player_message(&self, speaker: &str, content: &str, kind: MessageKind) {
        self.push(PresenterEvent::Player {
            speaker: speaker.to_owned(),
            content: content.to_owned(),
            kind,
        });
    }

    fn show_system_message(&self, content: &str) {
        self.push(PresenterEvent::System(content.to_owned()));
    }

    fn show_countdown(&self, remaining_secs: u64, total_secs: u64) {
        self.push(PresenterEvent::Countdown(remaining_secs, total_secs));
    }

    fn show_error(&self, message: &str) {
        self.push(PresenterEvent::Error(message.to_owned()));
    }
}

/// A presenter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn show_phase(&self, _phase: Phase, _chapter: u32, _cycle: u32) {}
    fn show_dm_message(&self, _content: &str) {}
    fn show_player_message(&self, _speaker: &str, _content: &str, _kind: MessageKind) {}
    fn show_system_message(&self, _content: &str) {}
    fn show_countdown(&self, _remaining_secs: u64, _total_secs: u64) {}
    fn show_error(&self, _message: &str) {}
}
