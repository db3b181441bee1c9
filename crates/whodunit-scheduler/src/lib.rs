//! Whodunit Scheduler — the finite-state engine that drives a session
//! through its phased chapters.
//!
//! One `Scheduler` owns one `Session`'s lifecycle: it advances the strict
//! DM-narration → player-speak → player-answer loop, enforces per-phase
//! time budgets, tracks completion across human and simulated
//! participants, and advances early whenever everyone required has acted.

pub mod scheduler;
pub mod session;
pub mod trackers;

mod timer;

pub use scheduler::Scheduler;
pub use session::{Session, SessionView};
pub use trackers::{AnswerCompletion, SpeakingCompletion};
