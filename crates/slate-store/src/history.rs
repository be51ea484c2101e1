//! Undo/redo history of board snapshots

use std::collections::VecDeque;

/// Bounded undo/redo stacks of snapshots
///
/// Each recorded snapshot is the state *before* a committed change. Undo
/// swaps the current state with the latest snapshot; redo swaps it back.
#[derive(Debug, Clone)]
pub struct History<S> {
    undo: VecDeque<S>,
    redo: Vec<S>,
    max_depth: usize,
}

impl<S> History<S> {
    /// Default number of undo steps kept
    pub const DEFAULT_DEPTH: usize = 100;

    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record the state before a committed change
    ///
    /// Any redo steps are discarded, and the oldest step is dropped once the
    /// history is full.
    pub fn record(&mut self, before: S) {
        self.redo.clear();
        self.undo.push_back(before);
        while self.undo.len() > self.max_depth {
            self.undo.pop_front();
        }
    }

    /// Step back, returning the state to restore
    pub fn undo(&mut self, current: S) -> Option<S> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Step forward, returning the state to restore
    pub fn redo(&mut self, current: S) -> Option<S> {
        let next = self.redo.pop()?;
        self.undo.push_back(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Drop the redo steps without recording an undo step
    pub fn discard_redo(&mut self) {
        self.redo.clear();
    }
}

impl<S> Default for History<S> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DEPTH)
    }
}
