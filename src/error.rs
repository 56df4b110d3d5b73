//! Error taxonomy shared by the parser, the mutation engine and the store.
//!
//! Every failure reaches the caller tagged by kind so the boundary layer can pick a
//! distinct outward signal. Nothing here is retried internally.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type OkrResult<T> = Result<T, OkrError>;

/// The pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Read,
    Parse,
    Lookup,
    Validation,
    Persist,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Parse => "parse",
            Self::Lookup => "lookup",
            Self::Validation => "validation",
            Self::Persist => "persist",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum OkrError {
    /// The document violates the grammar or the progress invariant.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A well-formed reference matched nothing in the current document.
    #[error("{0} not found")]
    NotFound(String),

    /// The reference itself is malformed.
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("failed to read document `{}`: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The mutation was computed but could not be written back.
    #[error("failed to persist document `{}`: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The operation ran past its budget; nothing was committed.
    #[error("{stage} exceeded the {}ms budget", .budget.as_millis())]
    Timeout { stage: Stage, budget: Duration },
}

impl OkrError {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Parse(_) => Stage::Parse,
            Self::NotFound(_) => Stage::Lookup,
            Self::Validation(_) => Stage::Validation,
            Self::Read { .. } => Stage::Read,
            Self::Persist { .. } => Stage::Persist,
            Self::Timeout { stage, .. } => *stage,
        }
    }
}

/// A grammar or invariant violation, located by objective and 1-based line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("objective `{objective}`, line {line}: {kind}")]
pub struct ParseError {
    pub objective: String,
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("heading has no text")]
    EmptyObjectiveName,

    #[error("objective name is used more than once")]
    DuplicateObjective,

    #[error("key result is missing an `[id]` prefix")]
    MissingId,

    #[error("key result id `{0}` is used more than once")]
    DuplicateKeyResult(String),

    #[error("key result `{0}` has no name")]
    EmptyKeyResultName(String),

    #[error("key result `{0}` has no `current/target` progress")]
    MissingProgress(String),

    #[error("{field} value `{value}` is not a non-negative integer")]
    InvalidNumber { field: &'static str, value: String },

    #[error("current {current} exceeds target {target}")]
    CurrentExceedsTarget { current: u64, target: u64 },

    #[error("nested list item `{0}` is not under a key result's contributors or comments")]
    UnexpectedListItem(String),

    #[error("text `{0}` after the key result list")]
    UnexpectedText(String),

    #[error("unterminated {0}")]
    Unterminated(&'static str),
}
