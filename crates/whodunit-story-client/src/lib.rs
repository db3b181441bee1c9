//! Whodunit Story Client — HTTP implementation of the story service
//! contract plus local persistence of the active session id.

pub mod http;
pub mod store;

pub use http::HttpStoryService;
pub use store::{SessionStore, StoredSession};
