//! Presentation layer contract.
//!
//! The scheduler never renders anything itself; it pushes display events
//! through this trait and the presentation layer (web UI, terminal, test
//! recorder) decides what to do with them. Implementations must not block.

use crate::phase::Phase;

/// How a player message should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// A public statement.
    Speak,
    /// A targeted question (rendered as "asks X: ...").
    Query,
    /// An answer to a question.
    Answer,
}

/// Display sink the scheduler pushes into.
pub trait Presenter: Send + Sync {
    /// The session entered a new phase.
    fn show_phase(&self, phase: Phase, chapter: u32, cycle: u32);

    /// DM narration or summary.
    fn show_dm_message(&self, content: &str);

    /// A participant spoke, asked, or answered.
    fn show_player_message(&self, speaker: &str, content: &str, kind: MessageKind);

    /// Out-of-band engine notice ("entering answer phase", "round 2", ...).
    fn show_system_message(&self, content: &str);

    /// Countdown tick for the active phase.
    fn show_countdown(&self, remaining_secs: u64, total_secs: u64);

    /// A user-visible error; automatic progression may have halted.
    fn show_error(&self, message: &str);
}
