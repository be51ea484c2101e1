//! Slate Core - Core types and transforms for canvas tables
//!
//! This crate defines the table element and the pure logic around it:
//! - `Table`: The structured table element and its integrity repair
//! - `resize`: Converting a gesture's scale factor into concrete track sizes
//! - `edit`: Adding and removing rows and columns
//! - `TableStore`: The contract for whatever persists elements

pub mod config;
pub mod edit;
pub mod element;
pub mod error;
pub mod geometry;
pub mod resize;
pub mod store;
pub mod table;

pub use config::*;
pub use edit::*;
pub use element::*;
pub use error::*;
pub use geometry::*;
pub use resize::*;
pub use store::*;
pub use table::*;
