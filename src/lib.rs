//! Objectives and key results kept in a hand-editable markdown document.
//!
//! The document is the source of truth. [`store::OkrStore`] parses it on demand,
//! applies single-step progress updates and writes them back without touching any
//! other byte of the file.

pub mod api;
pub mod config;
pub mod error;
pub mod markdown;
pub mod models;
pub mod mutation;
pub mod store;
pub mod tree_render;

pub use error::{OkrError, OkrResult, ParseError, ParseErrorKind, Stage};
pub use store::{OkrStore, StoreConfig};
