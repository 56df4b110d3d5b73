use std::ops::Range;

use crate::models::Objective;

/// Output of [`parse_document`](super::parse_document): the model plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub objectives: Vec<Objective>,
    pub source_map: SourceMap,
}

/// Source positions for every parsed entity, parallel to `ParsedDocument::objectives`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMap {
    pub objectives: Vec<ObjectiveSpan>,
}

impl SourceMap {
    pub fn key_result(&self, objective: usize, key_result: usize) -> Option<&KeyResultSpan> {
        self.objectives.get(objective)?.key_results.get(key_result)
    }
}

/// Lines (1-based, inclusive) covered by one objective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectiveSpan {
    pub name: String,
    pub first_line: usize,
    pub last_line: usize,
    pub key_results: Vec<KeyResultSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyResultSpan {
    pub id: String,
    /// 1-based line of the key result item.
    pub line: usize,
    /// Byte range of the `current` digits in the original text.
    pub current: Range<usize>,
}
