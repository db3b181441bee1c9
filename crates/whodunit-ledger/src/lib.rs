//! Whodunit Ledger — the append-only log of recorded actions.
//!
//! The ledger is the sole source of truth for "what has happened this
//! cycle": completion tracking and query collection always re-derive from
//! it rather than from any transient accumulator.

mod action;
mod ledger;

pub use action::{Action, CANNOT_SPEAK, DECLINES_TO_ANSWER, KEPT_SILENCE};
pub use ledger::ActionLedger;
