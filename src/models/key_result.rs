use serde::{Deserialize, Serialize};

/// A measurable sub-goal of an objective.
///
/// `target` is fixed by the document author; only `current` ever changes, and only
/// upwards by one step at a time. `0 <= current <= target` holds for every key result
/// the parser hands out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyResult {
    /// Short identifier, unique within the parent objective.
    pub id: String,
    pub name: String,
    pub current: u64,
    pub target: u64,
    /// People working on this key result. Order follows the document, duplicates are collapsed.
    pub contributors: Vec<String>,
    /// Free-text annotations in document (chronological) order.
    pub comments: Vec<String>,
}

impl KeyResult {
    pub fn new(id: impl Into<String>, name: impl Into<String>, current: u64, target: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            current,
            target,
            contributors: Vec::new(),
            comments: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.target
    }

    /// Steps left until the target is reached.
    pub fn remaining(&self) -> u64 {
        self.target.saturating_sub(self.current)
    }

    /// Add a contributor unless the name is already listed.
    pub fn add_contributor(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.contributors.contains(&name) {
            self.contributors.push(name);
        }
    }
}

/// What an increment actually did.
///
/// - `Updated`: `current` moved up by one
/// - `AlreadyComplete`: `current` already equalled `target`; nothing changed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MutationOutcome {
    Updated,
    AlreadyComplete,
}

impl MutationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::AlreadyComplete => "already_complete",
        }
    }
}

/// Result of incrementing a key result through the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyResultUpdate {
    pub key_result: KeyResult,
    pub outcome: MutationOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_counts_steps_to_target() {
        let kr = KeyResult::new("kr1", "Onboard teams", 2, 5);
        assert_eq!(kr.remaining(), 3);
        assert!(!kr.is_complete());
    }

    #[test]
    fn add_contributor_collapses_duplicates() {
        let mut kr = KeyResult::new("kr1", "Onboard teams", 0, 1);
        kr.add_contributor("Alice");
        kr.add_contributor("Bob");
        kr.add_contributor("Alice");
        assert_eq!(kr.contributors, vec!["Alice", "Bob"]);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let update = KeyResultUpdate {
            key_result: KeyResult::new("kr1", "Onboard teams", 3, 5),
            outcome: MutationOutcome::Updated,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["keyResult"]["current"], 3);
        assert_eq!(json["outcome"], "updated");
    }
}
