//! Whodunit Roster — the fixed ordered set of session participants.

mod participant;

pub use participant::{Participant, Roster};
