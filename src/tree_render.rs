//! ASCII tree rendering for objectives and their key results.

use crate::models::{KeyResult, Objective};

const NOT_STARTED: char = '○';
const IN_PROGRESS: char = '◐';
const COMPLETE: char = '●';

/// Get the progress symbol for a key result.
fn progress_symbol(key_result: &KeyResult) -> char {
    if key_result.is_complete() {
        COMPLETE
    } else if key_result.current == 0 {
        NOT_STARTED
    } else {
        IN_PROGRESS
    }
}

/// Render objectives as ASCII art with progress symbols.
///
/// Example output:
/// ```text
/// Grow usage (97%)
/// ├── ◐ [kr1] Onboard new teams 2/5
/// └── ● [kr2] Weekly active users 100/100
///
/// Ship faster (0%)
/// └── ○ [lead] Lead time 0/10
/// ```
pub fn render_tree(objectives: &[Objective]) -> String {
    let mut output = String::new();
    for (i, objective) in objectives.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        render_objective(&mut output, objective);
    }
    output
}

fn render_objective(output: &mut String, objective: &Objective) {
    output.push_str(&objective.name);
    if !objective.key_results.is_empty() {
        output.push_str(&format!(" ({:.0}%)", objective.progress() * 100.0));
    }
    output.push('\n');

    for (i, kr) in objective.key_results.iter().enumerate() {
        let is_last = i == objective.key_results.len() - 1;
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(branch);
        output.push(progress_symbol(kr));
        output.push_str(&format!(" [{}] {} {}/{}\n", kr.id, kr.name, kr.current, kr.target));

        // Contributors hang under their key result
        if !kr.contributors.is_empty() {
            let continuation = if is_last { "    " } else { "│   " };
            output.push_str(continuation);
            output.push_str("└── ");
            output.push_str(&kr.contributors.join(", "));
            output.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_objective(name: &str, key_results: Vec<KeyResult>) -> Objective {
        Objective {
            name: name.to_string(),
            description: String::new(),
            key_results,
        }
    }

    #[test]
    fn test_objective_without_key_results() {
        let output = render_tree(&[make_objective("Grow usage", vec![])]);
        assert_eq!(output, "Grow usage\n");
    }

    #[test]
    fn test_progress_symbols() {
        let output = render_tree(&[make_objective(
            "Grow usage",
            vec![
                KeyResult::new("kr1", "Onboard", 0, 4),
                KeyResult::new("kr2", "Actives", 2, 4),
                KeyResult::new("kr3", "Docs", 4, 4),
            ],
        )]);
        assert_eq!(
            output,
            "Grow usage (50%)\n├── ○ [kr1] Onboard 0/4\n├── ◐ [kr2] Actives 2/4\n└── ● [kr3] Docs 4/4\n"
        );
    }

    #[test]
    fn test_contributors_and_separation() {
        let mut kr = KeyResult::new("kr1", "Onboard", 1, 2);
        kr.add_contributor("Alice");
        kr.add_contributor("Bob");
        let output = render_tree(&[
            make_objective("Grow usage", vec![kr, KeyResult::new("kr2", "Docs", 0, 2)]),
            make_objective("Ship faster", vec![]),
        ]);
        let expected = "Grow usage (25%)\n├── ◐ [kr1] Onboard 1/2\n│   └── Alice, Bob\n└── ○ [kr2] Docs 0/2\n\nShip faster\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_progress_weights_by_totals() {
        let output = render_tree(&[
            make_objective(
                "Grow usage",
                vec![
                    KeyResult::new("kr1", "Onboard new teams", 2, 5),
                    KeyResult::new("kr2", "Weekly active users", 100, 100),
                ],
            ),
            make_objective("Ship faster", vec![KeyResult::new("lead", "Lead time", 0, 10)]),
        ]);
        let expected = "Grow usage (97%)\n├── ◐ [kr1] Onboard new teams 2/5\n└── ● [kr2] Weekly active users 100/100\n\nShip faster (0%)\n└── ○ [lead] Lead time 0/10\n";
        assert_eq!(output, expected);
    }
}
