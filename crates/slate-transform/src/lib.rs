//! Slate Transform - Interactive resize handling for canvas tables
//!
//! This crate connects a table element to the visual node that represents it:
//! - `TransformableNode`: The positioned, scalable rectangle a host renders
//! - `TableBoundBox`: The live constraint consulted on every resize frame
//! - `TableTransformController`: The start/live/end lifecycle of a resize
//! - `PositionGuard`: Keeps a node in place around context-menu interactions

pub mod bound_box;
pub mod controller;
pub mod guard;
pub mod node;

pub use bound_box::*;
pub use controller::*;
pub use guard::*;
pub use node::*;

#[cfg(test)]
pub(crate) mod test_support;
