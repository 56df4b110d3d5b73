use std::fmt::Write;

use super::source_map::KeyResultSpan;
use crate::models::Objective;

/// Rewrite one key result's `current` value in place.
///
/// `span` must come from parsing `source`. Every byte outside `span.current` is copied
/// through unchanged, including line endings and unrelated numbers.
pub fn replace_current(source: &str, span: &KeyResultSpan, current: u64) -> String {
    let value = current.to_string();
    let mut output = String::with_capacity(source.len() + value.len());
    output.push_str(&source[..span.current.start]);
    output.push_str(&value);
    output.push_str(&source[span.current.end..]);
    output
}

/// Regenerate a document from the model in canonical layout.
///
/// This drops anything the model does not carry (preamble, HTML comments, custom
/// spacing), so it is only used for new documents and exports, never for write-back.
pub fn render_document(objectives: &[Objective]) -> String {
    let mut output = String::new();

    for (i, objective) in objectives.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        let _ = writeln!(output, "# {}", objective.name);

        if !objective.description.is_empty() {
            output.push('\n');
            output.push_str(&objective.description);
            output.push('\n');
        }

        if !objective.key_results.is_empty() {
            output.push('\n');
        }
        for kr in &objective.key_results {
            let _ = writeln!(
                output,
                "- [{}] {} — {}/{}",
                kr.id, kr.name, kr.current, kr.target
            );
            if !kr.contributors.is_empty() {
                output.push_str("  - Contributors:\n");
                for contributor in &kr.contributors {
                    let _ = writeln!(output, "    - {contributor}");
                }
            }
            if !kr.comments.is_empty() {
                output.push_str("  - Comments:\n");
                for comment in &kr.comments {
                    let _ = writeln!(output, "    - {comment}");
                }
            }
        }
    }

    output
}
