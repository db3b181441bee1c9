//! Whodunit API — HTTP surface over the session scheduler.

pub mod error;
pub mod feed;
pub mod routes;
pub mod state;
