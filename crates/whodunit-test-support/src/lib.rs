//! Shared test mocks and utilities for the Whodunit session engine.

mod clock;
mod presenter;
mod story;

pub use clock::FixedClock;
pub use presenter::{NullPresenter, PresenterEvent, RecordingPresenter};
pub use story::{FailingStoryService, ScriptedStoryService, SubmittedAction, session_status};
