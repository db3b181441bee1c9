//! The append-only action ledger and its filtered views.

use std::collections::BTreeSet;

use whodunit_core::story::ActionKind;

use crate::action::Action;

/// Append-only ordered log of recorded actions.
///
/// Actions are appended in the order their triggering events are
/// *processed*; network latency can reorder simulated and human
/// submissions, which is why every completion check re-derives from the
/// ledger instead of assuming submission order.
#[derive(Debug, Default)]
pub struct ActionLedger {
    entries: Vec<Action>,
}

impl ActionLedger {
    /// An empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action. The sole mutation the ledger supports.
    pub fn append(&mut self, action: Action) {
        self.entries.push(action);
    }

    /// Number of recorded actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All recorded actions in processing order.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.entries.iter()
    }

    /// Lazy filtered view over one chapter/cycle scope.
    ///
    /// `kind` and `actor` narrow the view further when given. Never
    /// mutates the underlying list.
    pub fn actions_matching(
        &self,
        chapter: u32,
        cycle: u32,
        kind: Option<ActionKind>,
        actor: Option<&str>,
    ) -> impl Iterator<Item = &Action> {
        self.entries.iter().filter(move |a| {
            a.chapter == chapter
                && a.cycle == cycle
                && kind.is_none_or(|k| a.kind == k)
                && actor.is_none_or(|name| a.actor == name)
        })
    }

    /// Names of everyone who spoke this cycle.
    #[must_use]
    pub fn spoken_names(&self, chapter: u32, cycle: u32) -> BTreeSet<String> {
        self.actions_matching(chapter, cycle, Some(ActionKind::Speak), None)
            .map(|a| a.actor.clone())
            .collect()
    }

    /// Union of all query-map keys recorded in this cycle's speak actions.
    ///
    /// A participant queried by several speakers appears once.
    #[must_use]
    pub fn queried_names(&self, chapter: u32, cycle: u32) -> BTreeSet<String> {
        self.actions_matching(chapter, cycle, Some(ActionKind::Speak), None)
            .flat_map(|a| a.queries.keys().cloned())
            .collect()
    }

    /// Names of everyone who answered this cycle.
    #[must_use]
    pub fn answered_names(&self, chapter: u32, cycle: u32) -> BTreeSet<String> {
        self.actions_matching(chapter, cycle, Some(ActionKind::Answer), None)
            .map(|a| a.actor.clone())
            .collect()
    }

    /// The first question posed to `target` this cycle, with its asker.
    ///
    /// Used to attribute a simulated answer to the participant whose
    /// recorded speak action carried the question.
    #[must_use]
    pub fn question_for(&self, chapter: u32, cycle: u32, target: &str) -> Option<(String, String)> {
        self.actions_matching(chapter, cycle, Some(ActionKind::Speak), None)
            .find_map(|a| {
                a.queries
                    .get(target)
                    .map(|question| (a.actor.clone(), question.clone()))
            })
    }

    /// Renders the whole log as a transcript for DM summary prompts.
    #[must_use]
    pub fn transcript(&self) -> String {
        self.entries
            .iter()
            .map(|a| format!("**{}**: {}", a.actor, a.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::KEPT_SILENCE;
    use chrono::{DateTime, TimeZone, Utc};
    use std::collections::BTreeMap;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    fn queries(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_queried_names_unions_query_maps_across_actions() {
        // Arrange — A queries B; C queries B and D. B is required once.
        let mut ledger = ActionLedger::new();
        ledger.append(Action::speak("A", 1, 1, "...", queries(&[("B", "q1")]), at()));
        ledger.append(Action::speak(
            "C",
            1,
            1,
            "...",
            queries(&[("B", "q2"), ("D", "q3")]),
            at(),
        ));

        // Act
        let required = ledger.queried_names(1, 1);

        // Assert
        let expected: BTreeSet<String> = ["B", "D"].iter().map(|s| (*s).to_owned()).collect();
        assert_eq!(required, expected);
    }

    #[test]
    fn test_queried_names_is_scoped_to_chapter_and_cycle() {
        let mut ledger = ActionLedger::new();
        ledger.append(Action::speak("A", 1, 1, "...", queries(&[("B", "q1")]), at()));
        ledger.append(Action::speak("A", 1, 2, "...", queries(&[("C", "q2")]), at()));
        ledger.append(Action::speak("A", 2, 1, "...", queries(&[("D", "q3")]), at()));

        assert_eq!(ledger.queried_names(1, 2).len(), 1);
        assert!(ledger.queried_names(1, 2).contains("C"));
    }

    #[test]
    fn test_actions_matching_filters_by_kind_and_actor() {
        let mut ledger = ActionLedger::new();
        ledger.append(Action::speak("A", 1, 1, "hello", BTreeMap::new(), at()));
        ledger.append(Action::answer("B", 1, 1, "in the garden", "where?", at()));
        ledger.append(Action::answer("C", 1, 1, "asleep", "where?", at()));

        let answers: Vec<_> = ledger
            .actions_matching(1, 1, Some(ActionKind::Answer), None)
            .collect();
        assert_eq!(answers.len(), 2);

        let by_c: Vec<_> = ledger.actions_matching(1, 1, None, Some("C")).collect();
        assert_eq!(by_c.len(), 1);
        assert_eq!(by_c[0].actor, "C");
    }

    #[test]
    fn test_question_for_attributes_first_recorded_asker() {
        let mut ledger = ActionLedger::new();
        ledger.append(Action::speak("A", 1, 1, "...", queries(&[("B", "q1")]), at()));
        ledger.append(Action::speak("C", 1, 1, "...", queries(&[("B", "q2")]), at()));

        let (asker, question) = ledger.question_for(1, 1, "B").unwrap();
        assert_eq!(asker, "A");
        assert_eq!(question, "q1");
        assert!(ledger.question_for(1, 1, "Z").is_none());
    }

    #[test]
    fn test_spoken_names_includes_silence_sentinels() {
        let mut ledger = ActionLedger::new();
        ledger.append(Action::speak("A", 1, 1, "hello", BTreeMap::new(), at()));
        ledger.append(Action::kept_silence("B", 1, 1, at()));

        let spoken = ledger.spoken_names(1, 1);
        assert!(spoken.contains("A"));
        assert!(spoken.contains("B"));
    }

    #[test]
    fn test_transcript_renders_speaker_prefixed_lines() {
        let mut ledger = ActionLedger::new();
        ledger.append(Action::speak("A", 1, 1, "hello", BTreeMap::new(), at()));
        ledger.append(Action::kept_silence("B", 1, 1, at()));

        let transcript = ledger.transcript();
        assert_eq!(transcript, format!("**A**: hello\n**B**: {KEPT_SILENCE}"));
    }
}
