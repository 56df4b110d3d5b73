use std::fmt;

use serde::{Deserialize, Serialize};

use super::KeyResult;
use crate::error::OkrError;

/// A top-level goal with its key results.
///
/// Objectives carry no surrogate id. Callers address them by position in the document
/// or by `name`, which the parser guarantees to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub name: String,
    pub description: String,
    /// Document order, which is also the addressing and display order.
    pub key_results: Vec<KeyResult>,
}

impl Objective {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            key_results: Vec::new(),
        }
    }

    /// Linear scan by id. `None` means "no such key result", never "bad request".
    pub fn find_key_result(&self, id: &str) -> Option<&KeyResult> {
        self.key_results.iter().find(|kr| kr.id == id)
    }

    pub fn find_key_result_mut(&mut self, id: &str) -> Option<&mut KeyResult> {
        self.key_results.iter_mut().find(|kr| kr.id == id)
    }

    /// Aggregate completion in `0.0..=1.0`. An objective without key results counts as 0.
    pub fn progress(&self) -> f64 {
        let (current, target) = self
            .key_results
            .iter()
            .fold((0u128, 0u128), |(c, t), kr| {
                (c + u128::from(kr.current), t + u128::from(kr.target))
            });
        if target == 0 {
            0.0
        } else {
            current as f64 / target as f64
        }
    }
}

/// Reference to an objective as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectiveRef {
    /// Zero-based position in document order.
    Index(usize),
    /// Exact objective name.
    Name(String),
}

impl ObjectiveRef {
    /// Interpret a raw path segment or CLI argument.
    ///
    /// All-digit input is an index, anything else non-blank is a name. Blank input and
    /// negative indices are rejected as malformed rather than "not found". Digit strings
    /// too long for an index are names.
    pub fn parse(raw: &str) -> Result<Self, OkrError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(OkrError::Validation(
                "objective reference is empty".to_string(),
            ));
        }

        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = trimmed.parse::<usize>() {
                return Ok(Self::Index(index));
            }
        }

        if let Some(rest) = trimmed.strip_prefix('-') {
            if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
                return Err(OkrError::Validation(format!(
                    "objective index `{trimmed}` must not be negative"
                )));
            }
        }

        Ok(Self::Name(trimmed.to_string()))
    }
}

impl fmt::Display for ObjectiveRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{index}"),
            Self::Name(name) => write!(f, "`{name}`"),
        }
    }
}

/// Position of the referenced objective, if it exists.
///
/// An index past the end falls back to an objective whose name is that number, so a
/// heading like `# 2024` stays addressable. Positions win when both could match.
pub fn find_objective(objectives: &[Objective], reference: &ObjectiveRef) -> Option<usize> {
    match reference {
        ObjectiveRef::Index(index) if *index < objectives.len() => Some(*index),
        ObjectiveRef::Index(index) => objectives.iter().position(|o| {
            o.name.bytes().all(|b| b.is_ascii_digit()) && o.name.parse::<usize>() == Ok(*index)
        }),
        ObjectiveRef::Name(name) => objectives.iter().position(|o| &o.name == name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Objective> {
        let mut grow = Objective::new("Grow usage");
        grow.key_results.push(KeyResult::new("kr1", "Onboard teams", 2, 5));
        grow.key_results.push(KeyResult::new("kr2", "Weekly actives", 0, 100));
        vec![grow, Objective::new("Ship faster")]
    }

    #[test]
    fn find_key_result_returns_none_for_unknown_id() {
        let objectives = sample();
        assert!(objectives[0].find_key_result("kr1").is_some());
        assert!(objectives[0].find_key_result("nonexistent").is_none());
    }

    #[test]
    fn parse_reference_distinguishes_index_and_name() {
        assert_eq!(ObjectiveRef::parse("1").unwrap(), ObjectiveRef::Index(1));
        assert_eq!(
            ObjectiveRef::parse(" Grow usage ").unwrap(),
            ObjectiveRef::Name("Grow usage".to_string())
        );
        assert_eq!(
            ObjectiveRef::parse("2024 goals").unwrap(),
            ObjectiveRef::Name("2024 goals".to_string())
        );
    }

    #[test]
    fn parse_reference_rejects_blank_and_negative() {
        assert!(matches!(ObjectiveRef::parse("  "), Err(OkrError::Validation(_))));
        assert!(matches!(ObjectiveRef::parse("-1"), Err(OkrError::Validation(_))));
    }

    #[test]
    fn find_objective_checks_bounds() {
        let objectives = sample();
        assert_eq!(find_objective(&objectives, &ObjectiveRef::Index(1)), Some(1));
        assert_eq!(find_objective(&objectives, &ObjectiveRef::Index(2)), None);
        assert_eq!(
            find_objective(&objectives, &ObjectiveRef::Name("Ship faster".into())),
            Some(1)
        );
    }

    #[test]
    fn numeric_names_are_found_when_no_position_matches() {
        let mut objectives = sample();
        objectives.push(Objective::new("2024"));

        let reference = ObjectiveRef::parse("2024").unwrap();
        assert_eq!(reference, ObjectiveRef::Index(2024));
        assert_eq!(find_objective(&objectives, &reference), Some(2));
        assert_eq!(find_objective(&objectives, &ObjectiveRef::Index(0)), Some(0));
        assert_eq!(find_objective(&objectives, &ObjectiveRef::Index(2025)), None);
    }

    #[test]
    fn overlong_digit_strings_are_names() {
        let raw = "123456789012345678901234567890";
        assert_eq!(
            ObjectiveRef::parse(raw).unwrap(),
            ObjectiveRef::Name(raw.to_string())
        );
    }

    #[test]
    fn progress_does_not_overflow_on_large_values() {
        let mut big = Objective::new("Big");
        big.key_results.push(KeyResult::new("kr1", "Max", u64::MAX, u64::MAX));
        big.key_results.push(KeyResult::new("kr2", "One", 1, 1));
        assert_eq!(big.progress(), 1.0);
    }

    #[test]
    fn progress_aggregates_key_results() {
        let objectives = sample();
        assert!((objectives[0].progress() - 2.0 / 105.0).abs() < f64::EPSILON);
        assert_eq!(objectives[1].progress(), 0.0);
    }
}
