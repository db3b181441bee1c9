//! Recorded participant actions.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use whodunit_core::story::ActionKind;

/// Sentinel content for a participant who let the speak phase time out.
pub const KEPT_SILENCE: &str = "[kept silence]";

/// Sentinel content for a simulated participant whose speech failed.
pub const CANNOT_SPEAK: &str = "[has nothing to say]";

/// Sentinel content for a simulated participant whose answer failed.
pub const DECLINES_TO_ANSWER: &str = "[declines to answer]";

/// One recorded action. Append-only: never mutated or removed.
#[derive(Debug, Clone, Serialize)]
pub struct Action {
    /// Speak or answer.
    pub kind: ActionKind,
    /// The acting participant's name.
    pub actor: String,
    /// Chapter the action belongs to.
    pub chapter: u32,
    /// Cycle within the chapter.
    pub cycle: u32,
    /// What was said.
    pub content: String,
    /// Targeted questions (speak actions only): target name → question.
    pub queries: BTreeMap<String, String>,
    /// The question being answered (answer actions only).
    pub in_response_to: Option<String>,
    /// When the triggering event was processed.
    pub created_at: DateTime<Utc>,
}

impl Action {
    /// A speak action, optionally carrying targeted queries.
    #[must_use]
    pub fn speak(
        actor: impl Into<String>,
        chapter: u32,
        cycle: u32,
        content: impl Into<String>,
        queries: BTreeMap<String, String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: ActionKind::Speak,
            actor: actor.into(),
            chapter,
            cycle,
            content: content.into(),
            queries,
            in_response_to: None,
            created_at,
        }
    }

    /// The kept-silence sentinel recorded for a participant who did not
    /// speak before the phase timed out.
    #[must_use]
    pub fn kept_silence(
        actor: impl Into<String>,
        chapter: u32,
        cycle: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::speak(
            actor,
            chapter,
            cycle,
            KEPT_SILENCE,
            BTreeMap::new(),
            created_at,
        )
    }

    /// An answer action.
    #[must_use]
    pub fn answer(
        actor: impl Into<String>,
        chapter: u32,
        cycle: u32,
        content: impl Into<String>,
        in_response_to: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: ActionKind::Answer,
            actor: actor.into(),
            chapter,
            cycle,
            content: content.into(),
            queries: BTreeMap::new(),
            in_response_to: Some(in_response_to.into()),
            created_at,
        }
    }

    /// True when the content is one of the sentinel markers.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        matches!(
            self.content.as_str(),
            KEPT_SILENCE | CANNOT_SPEAK | DECLINES_TO_ANSWER
        )
    }
}
