//! Whodunit Core — shared contracts for the session engine.
//!
//! This crate defines the traits and types every other crate depends on:
//! the clock abstraction, the phase vocabulary, the error taxonomy, the
//! game configuration, and the contracts for the two external
//! collaborators (the remote story service and the presentation layer).
//! It contains no infrastructure code.

pub mod clock;
pub mod config;
pub mod error;
pub mod phase;
pub mod presenter;
pub mod story;
