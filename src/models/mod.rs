//! Domain models for okrdown.
//!
//! # Core Concepts
//!
//! - [`Objective`]: A top-level goal, addressed by its position in the document or by its
//!   unique name. Owns an ordered list of key results.
//! - [`KeyResult`]: A measurable sub-goal with `current`/`target` progress. Addressed by an
//!   `id` that is unique within its objective only.
//! - [`ObjectiveRef`]: How callers point at an objective (index or name).
//!
//! The document, not this model, is the source of truth. Models are rebuilt from the
//! markdown whenever the document changes and are never persisted on their own.

mod key_result;
mod objective;

pub use key_result::*;
pub use objective::*;
