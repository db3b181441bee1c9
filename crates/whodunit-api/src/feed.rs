//! Buffered presenter backing the session feed endpoint.
//!
//! The scheduler pushes display events as they happen; clients poll the
//! feed with the offset of the last event they have seen.

use std::sync::Mutex;

use serde::Serialize;
use whodunit_core::phase::Phase;
use whodunit_core::presenter::{MessageKind, Presenter};

/// One display event, as delivered to feed clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEvent {
    /// The session entered a new phase.
    Phase {
        /// The phase entered.
        phase: Phase,
        /// Current chapter.
        chapter: u32,
        /// Current cycle.
        cycle: u32,
    },
    /// DM narration or summary.
    Dm {
        /// Narration text.
        content: String,
    },
    /// A participant spoke, asked, or answered.
    Player {
        /// Who spoke.
        speaker: String,
        /// What was said.
        content: String,
        /// `speak`, `query`, or `answer`.
        kind: &'static str,
    },
    /// An engine notice.
    System {
        /// Notice text.
        content: String,
    },
    /// A countdown tick for the active phase.
    Countdown {
        /// Seconds left.
        remaining_secs: u64,
        /// Phase budget in seconds.
        total_secs: u64,
    },
    /// A user-visible error.
    Error {
        /// Error text.
        message: String,
    },
}

fn kind_label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Speak => "speak",
        MessageKind::Query => "query",
        MessageKind::Answer => "answer",
    }
}

/// Append-only event buffer implementing `Presenter`.
#[derive(Debug, Default)]
pub struct FeedBuffer {
    events: Mutex<Vec<FeedEvent>>,
}

impl FeedBuffer {
    /// An empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events from `offset` onward, with the offset to poll from next.
    #[must_use]
    pub fn since(&self, offset: usize) -> (Vec<FeedEvent>, usize) {
        let events = self
            .events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let next = events.len();
        (events.get(offset..).unwrap_or_default().to_vec(), next)
    }

    fn push(&self, event: FeedEvent) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event);
    }
}

impl Presenter for FeedBuffer {
    fn show_phase(&self, phase: Phase, chapter: u32, cycle: u32) {
        self.push(FeedEvent::Phase {
            phase,
            chapter,
            cycle,
        });
    }

    fn show_dm_message(&self, content: &str) {
        self.push(FeedEvent::Dm {
            content: content.to_owned(),
        });
    }

    fn show_player_message(&self, speaker: &str, content: &str, kind: MessageKind) {
        self.push(FeedEvent::Player {
            speaker: speaker.to_owned(),
            content: content.to_owned(),
            kind: kind_label(kind),
        });
    }

    fn show_system_message(&self, content: &str) {
        self.push(FeedEvent::System {
            content: content.to_owned(),
        });
    }

    fn show_countdown(&self, remaining_secs: u64, total_secs: u64) {
        self.push(FeedEvent::Countdown {
            remaining_secs,
            total_secs,
        });
    }

    fn show_error(&self, message: &str) {
        self.push(FeedEvent::Error {
            message: message.to_owned(),
        });
    }
}
