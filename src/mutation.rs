//! Bounded progress updates on a loaded model.

use crate::error::{OkrError, OkrResult};
use crate::models::{find_objective, KeyResult, MutationOutcome, ObjectiveRef, Objective};

/// Where an increment landed and what it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Increment {
    pub objective_index: usize,
    pub key_result_index: usize,
    /// The key result after the increment.
    pub key_result: KeyResult,
    pub outcome: MutationOutcome,
}

/// Move a key result's `current` up by one, never past `target`.
///
/// A key result that already reached its target is left alone and reported as
/// [`MutationOutcome::AlreadyComplete`]. Unknown objectives or key results are
/// [`OkrError::NotFound`]; a blank key result id is [`OkrError::Validation`].
pub fn increment(
    objectives: &mut [Objective],
    objective: &ObjectiveRef,
    key_result_id: &str,
) -> OkrResult<Increment> {
    let key_result_id = key_result_id.trim();
    if key_result_id.is_empty() {
        return Err(OkrError::Validation(
            "key result id is empty".to_string(),
        ));
    }

    let objective_index = find_objective(objectives, objective)
        .ok_or_else(|| OkrError::NotFound(format!("objective {objective}")))?;
    let target = &mut objectives[objective_index];

    let key_result_index = target
        .key_results
        .iter()
        .position(|kr| kr.id == key_result_id)
        .ok_or_else(|| {
            OkrError::NotFound(format!(
                "key result `{key_result_id}` in objective `{}`",
                target.name
            ))
        })?;
    let key_result = &mut target.key_results[key_result_index];

    let outcome = if key_result.current >= key_result.target {
        MutationOutcome::AlreadyComplete
    } else {
        key_result.current += 1;
        MutationOutcome::Updated
    };

    Ok(Increment {
        objective_index,
        key_result_index,
        key_result: key_result.clone(),
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn objectives(current: u64, target: u64) -> Vec<Objective> {
        let mut grow = Objective::new("Grow usage");
        grow.key_results
            .push(KeyResult::new("kr0", "Untouched", 1, 3));
        grow.key_results
            .push(KeyResult::new("kr1", "Onboard teams", current, target));
        vec![Objective::new("Ship faster"), grow]
    }

    fn by_name() -> ObjectiveRef {
        ObjectiveRef::Name("Grow usage".to_string())
    }

    #[test]
    fn increments_by_exactly_one() {
        let mut objectives = objectives(2, 5);
        let result = increment(&mut objectives, &by_name(), "kr1").unwrap();

        assert_eq!(result.outcome, MutationOutcome::Updated);
        assert_eq!(result.key_result.current, 3);
        assert_eq!(result.key_result.target, 5);
        assert_eq!((result.objective_index, result.key_result_index), (1, 1));
        assert_eq!(objectives[1].key_results[1].current, 3);
        assert_eq!(objectives[1].key_results[0].current, 1);
    }

    #[test]
    fn reaches_but_never_passes_target() {
        let mut objectives = objectives(4, 5);
        let first = increment(&mut objectives, &ObjectiveRef::Index(1), "kr1").unwrap();
        assert_eq!(first.key_result.current, 5);
        assert_eq!(first.outcome, MutationOutcome::Updated);

        let second = increment(&mut objectives, &ObjectiveRef::Index(1), "kr1").unwrap();
        assert_eq!(second.outcome, MutationOutcome::AlreadyComplete);
        assert_eq!(second.key_result.current, 5);
    }

    #[test]
    fn complete_key_result_is_left_unchanged() {
        let mut objectives = objectives(5, 5);
        let before = objectives.clone();
        let result = increment(&mut objectives, &by_name(), "kr1").unwrap();

        assert_eq!(result.outcome, MutationOutcome::AlreadyComplete);
        assert_eq!(objectives, before);
    }

    #[test]
    fn zero_target_is_already_complete() {
        let mut objectives = objectives(0, 0);
        let result = increment(&mut objectives, &by_name(), "kr1").unwrap();
        assert_eq!(result.outcome, MutationOutcome::AlreadyComplete);
    }

    #[test]
    fn unknown_targets_are_not_found() {
        let mut objectives = objectives(2, 5);
        let before = objectives.clone();

        let err = increment(&mut objectives, &by_name(), "nonexistent").unwrap_err();
        assert!(matches!(err, OkrError::NotFound(_)));

        let err = increment(&mut objectives, &ObjectiveRef::Index(7), "kr1").unwrap_err();
        assert!(matches!(err, OkrError::NotFound(_)));

        let err = increment(
            &mut objectives,
            &ObjectiveRef::Name("Nope".to_string()),
            "kr1",
        )
        .unwrap_err();
        assert!(matches!(err, OkrError::NotFound(_)));

        assert_eq!(objectives, before);
    }

    #[test]
    fn blank_key_result_id_is_invalid() {
        let mut objectives = objectives(2, 5);
        let err = increment(&mut objectives, &by_name(), "  ").unwrap_err();
        assert!(matches!(err, OkrError::Validation(_)));
    }
}
