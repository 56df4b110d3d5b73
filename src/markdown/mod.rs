//! The OKR markdown format: parsing into the model and writing changes back.
//!
//! ```markdown
//! # Grow usage
//!
//! Increase adoption across all teams.
//!
//! - [kr1] Onboard new teams — 2/5
//!   - Contributors: Alice, Bob
//!   - Comments:
//!     - Kickoff done
//! - [kr2] Weekly active users: 40 of 100
//! ```
//!
//! Headings are objectives, the prose under them is the description, and each top-level
//! list item is a key result. The layout is part of the external contract: people edit
//! it by hand and [`replace_current`] relies on it staying put.

mod parser;
mod serializer;
mod source_map;

pub use parser::parse_document;
pub use serializer::{render_document, replace_current};
pub use source_map::{KeyResultSpan, ObjectiveSpan, ParsedDocument, SourceMap};
