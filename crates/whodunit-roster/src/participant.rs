//! Participants and the session roster.

use serde::Serialize;
use whodunit_core::error::EngineError;
use whodunit_core::story::ParticipantSpec;

/// One character in the session.
///
/// Created once at character-assignment time and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    /// Character name, unique within the session.
    pub name: String,
    /// True when driven by the remote story service.
    pub is_simulated: bool,
    /// True for the one character controlled by this client.
    pub is_local: bool,
}

/// Ordered, fixed-size set of participants for a session's lifetime.
///
/// Built exactly once from wire descriptors; downstream code never
/// branches on descriptor shape again.
#[derive(Debug, Clone)]
pub struct Roster {
    members: Vec<Participant>,
}

impl Roster {
    /// Normalizes wire descriptors into a roster.
    ///
    /// `local_name` selects the one member controlled by this client; it
    /// must name a non-simulated entry.
    ///
    /// # Errors
    ///
    /// `Validation` when the roster is empty, a name repeats, the local
    /// name is missing, or the local name refers to a simulated entry.
    pub fn from_specs(specs: &[ParticipantSpec], local_name: &str) -> Result<Self, EngineError> {
        if specs.is_empty() {
            return Err(EngineError::Validation("roster must not be empty".into()));
        }

        let mut members = Vec::with_capacity(specs.len());
        for spec in specs {
            if members.iter().any(|m: &Participant| m.name == spec.name) {
                return Err(EngineError::Validation(format!(
                    "duplicate participant name: {}",
                    spec.name
                )));
            }
            members.push(Participant {
                name: spec.name.clone(),
                is_simulated: spec.is_simulated,
                is_local: spec.name == local_name,
            });
        }

        let local = members
            .iter()
            .find(|m| m.is_local)
            .ok_or_else(|| {
                EngineError::Validation(format!("local participant {local_name} not in roster"))
            })?;
        if local.is_simulated {
            return Err(EngineError::Validation(format!(
                "local participant {local_name} is marked simulated"
            )));
        }

        Ok(Self { members })
    }

    /// Number of roster members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when the roster has no members (never the case after
    /// construction; provided for completeness).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates members in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.members.iter()
    }

    /// Looks up a member by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Participant> {
        self.members.iter().find(|m| m.name == name)
    }

    /// True when `name` belongs to the roster.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The one member controlled by this client.
    #[must_use]
    pub fn local(&self) -> &Participant {
        // Construction guarantees exactly one local member.
        self.members
            .iter()
            .find(|m| m.is_local)
            .expect("roster invariant: exactly one local member")
    }

    /// Members driven by the story service, in roster order.
    pub fn simulated(&self) -> impl Iterator<Item = &Participant> {
        self.members.iter().filter(|m| m.is_simulated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, is_simulated: bool) -> ParticipantSpec {
        ParticipantSpec {
            name: name.to_owned(),
            is_simulated,
        }
    }

    #[test]
    fn test_from_specs_normalizes_and_tags_local() {
        // Arrange
        let specs = vec![spec("Ada", false), spec("Basil", true), spec("Clara", true)];

        // Act
        let roster = Roster::from_specs(&specs, "Ada").unwrap();

        // Assert
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.local().name, "Ada");
        assert!(!roster.local().is_simulated);
        let simulated: Vec<_> = roster.simulated().map(|p| p.name.as_str()).collect();
        assert_eq!(simulated, vec!["Basil", "Clara"]);
    }

    #[test]
    fn test_from_specs_preserves_order() {
        let specs = vec![spec("Clara", true), spec("Ada", false), spec("Basil", true)];
        let roster = Roster::from_specs(&specs, "Ada").unwrap();
        let names: Vec<_> = roster.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Clara", "Ada", "Basil"]);
    }

    #[test]
    fn test_from_specs_rejects_duplicate_names() {
        let specs = vec![spec("Ada", false), spec("Ada", true)];
        let result = Roster::from_specs(&specs, "Ada");
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_from_specs_rejects_missing_local() {
        let specs = vec![spec("Basil", true)];
        let result = Roster::from_specs(&specs, "Ada");
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_from_specs_rejects_simulated_local() {
        let specs = vec![spec("Ada", true)];
        let result = Roster::from_specs(&specs, "Ada");
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_from_specs_rejects_empty_roster() {
        let result = Roster::from_specs(&[], "Ada");
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }
}
