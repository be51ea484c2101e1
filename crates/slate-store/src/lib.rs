//! Slate Store - Board storage for canvas tables
//!
//! This crate provides:
//! - An in-memory board implementing `TableStore`
//! - Snapshot-based undo/redo driven by `push_history`
//! - Board persistence as a single JSON file

pub mod board;
pub mod error;
pub mod history;

pub use board::*;
pub use error::*;
pub use history::*;
