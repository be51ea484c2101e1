//! Position preservation around context-menu interactions
//!
//! Opening a context menu can move a node as a side effect of the host's
//! hit-testing and focus handling. The guard snapshots the node's position
//! before the menu opens and puts it back if it drifts.

use std::time::Duration;

use slate_core::{Position, TableConfig};
use tracing::debug;

use crate::{NodeAttrs, TransformableNode};

/// A deferred restoration check the host should run later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreCheck {
    /// Run after a short timer
    Timer(Duration),

    /// Run on the next paint
    NextPaint,
}

/// The host side that runs deferred restoration checks
///
/// When a scheduled check fires, the host calls
/// [`PositionGuard::run_check`] with the node.
pub trait RestoreScheduler {
    fn schedule(&mut self, check: RestoreCheck);
}

/// What a restoration check did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RestoreOutcome {
    /// The node had drifted and was moved back
    Restored { from: Position, to: Position },

    /// The node was within tolerance of its snapshot
    Unchanged,

    /// No snapshot was pending (already restored or cancelled)
    NoSnapshot,
}

/// Snapshots a node's position and restores it after drift
#[derive(Debug, Clone)]
pub struct PositionGuard {
    snapshot: Option<Position>,
    tolerance: f64,
    restore_delay: Duration,
}

impl PositionGuard {
    pub fn new(config: &TableConfig) -> Self {
        Self {
            snapshot: None,
            tolerance: config.position_tolerance,
            restore_delay: config.restore_delay(),
        }
    }

    /// Context menu requested on `node`
    ///
    /// Must run before any menu-opening side effects. Schedules both a timer
    /// and a next-paint check; whichever runs first restores, the other finds
    /// no snapshot.
    pub fn on_context_menu<N>(&mut self, node: &N, scheduler: &mut dyn RestoreScheduler)
    where
        N: TransformableNode + ?Sized,
    {
        let position = node.position();
        self.snapshot = Some(position);
        debug!("Preserving node position ({}, {})", position.x, position.y);

        scheduler.schedule(RestoreCheck::Timer(self.restore_delay));
        scheduler.schedule(RestoreCheck::NextPaint);
    }

    /// Run a scheduled check against `node`, clearing the snapshot
    pub fn run_check<N>(&mut self, node: &mut N) -> RestoreOutcome
    where
        N: TransformableNode + ?Sized,
    {
        let Some(snapshot) = self.snapshot.take() else {
            return RestoreOutcome::NoSnapshot;
        };
        restore_if_drifted(node, snapshot, self.tolerance)
    }

    /// Drop a pending snapshot without restoring
    pub fn cancel(&mut self) {
        self.snapshot = None;
    }

    /// The pending snapshot, if any
    pub fn snapshot(&self) -> Option<Position> {
        self.snapshot
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl Default for PositionGuard {
    fn default() -> Self {
        Self::new(&TableConfig::default())
    }
}

/// Run `operation` on `node`, keeping the node where it started
///
/// If the node drifts by more than `tolerance` it is moved back, whether the
/// operation succeeded or failed. The operation's own result is returned
/// unchanged.
pub fn with_position_preservation<N, T, E, F>(
    node: &mut N,
    tolerance: f64,
    operation: F,
) -> Result<T, E>
where
    N: TransformableNode + ?Sized,
    F: FnOnce(&mut N) -> Result<T, E>,
{
    let snapshot = node.position();
    let result = operation(node);
    restore_if_drifted(node, snapshot, tolerance);
    result
}

fn restore_if_drifted<N>(node: &mut N, snapshot: Position, tolerance: f64) -> RestoreOutcome
where
    N: TransformableNode + ?Sized,
{
    let current = node.position();
    if !current.drifted_from(&snapshot, tolerance) {
        return RestoreOutcome::Unchanged;
    }

    node.set_attrs(NodeAttrs::position(snapshot));
    node.batch_draw();
    debug!(
        "Restored node position ({}, {}) -> ({}, {})",
        current.x, current.y, snapshot.x, snapshot.y
    );

    RestoreOutcome::Restored {
        from: current,
        to: snapshot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockNode, RecordingScheduler};

    #[test]
    fn test_context_menu_schedules_both_checks() {
        let mut guard = PositionGuard::default();
        let mut scheduler = RecordingScheduler::default();
        let node = MockNode::at(10.0, 20.0);

        guard.on_context_menu(&node, &mut scheduler);

        assert_eq!(guard.snapshot(), Some(Position::new(10.0, 20.0)));
        assert_eq!(
            scheduler.scheduled,
            vec![
                RestoreCheck::Timer(Duration::from_millis(10)),
                RestoreCheck::NextPaint
            ]
        );
    }

    #[test]
    fn test_small_drift_is_tolerated() {
        let mut guard = PositionGuard::default();
        let mut scheduler = RecordingScheduler::default();
        let mut node = MockNode::at(10.0, 20.0);

        guard.on_context_menu(&node, &mut scheduler);
        node.x = 10.05;

        assert_eq!(guard.run_check(&mut node), RestoreOutcome::Unchanged);
        assert_eq!(node.x, 10.05);
        assert_eq!(node.redraws, 0);
        assert_eq!(guard.snapshot(), None);
    }

    #[test]
    fn test_drift_is_restored() {
        let mut guard = PositionGuard::default();
        let mut scheduler = RecordingScheduler::default();
        let mut node = MockNode::at(10.0, 20.0);

        guard.on_context_menu(&node, &mut scheduler);
        node.x = 12.0;

        let outcome = guard.run_check(&mut node);
        assert_eq!(
            outcome,
            RestoreOutcome::Restored {
                from: Position::new(12.0, 20.0),
                to: Position::new(10.0, 20.0)
            }
        );
        assert_eq!(node.position(), Position::new(10.0, 20.0));
        assert_eq!(node.redraws, 1);
    }

    #[test]
    fn test_second_check_is_noop() {
        let mut guard = PositionGuard::default();
        let mut scheduler = RecordingScheduler::default();
        let mut node = MockNode::at(10.0, 20.0);

        guard.on_context_menu(&node, &mut scheduler);
        node.y = 40.0;
        guard.run_check(&mut node);

        node.y = 50.0;
        assert_eq!(guard.run_check(&mut node), RestoreOutcome::NoSnapshot);
        assert_eq!(node.y, 50.0);
    }

    #[test]
    fn test_cancel_clears_snapshot() {
        let mut guard = PositionGuard::default();
        let mut scheduler = RecordingScheduler::default();
        let mut node = MockNode::at(0.0, 0.0);

        guard.on_context_menu(&node, &mut scheduler);
        guard.cancel();
        node.x = 100.0;

        assert_eq!(guard.run_check(&mut node), RestoreOutcome::NoSnapshot);
        assert_eq!(node.x, 100.0);
    }

    #[test]
    fn test_wrapper_restores_after_success() {
        let mut node = MockNode::at(5.0, 5.0);
        let value: Result<u32, String> = with_position_preservation(&mut node, 0.1, |node| {
            node.x = 50.0;
            Ok(7)
        });
        assert_eq!(value, Ok(7));
        assert_eq!(node.position(), Position::new(5.0, 5.0));
    }

    #[test]
    fn test_wrapper_restores_and_propagates_failure() {
        let mut node = MockNode::at(5.0, 5.0);
        let value: Result<(), String> = with_position_preservation(&mut node, 0.1, |node| {
            node.y = -30.0;
            Err("menu action failed".to_string())
        });
        assert_eq!(value, Err("menu action failed".to_string()));
        assert_eq!(node.position(), Position::new(5.0, 5.0));
    }

    #[test]
    fn test_wrapper_leaves_untouched_node_alone() {
        let mut node = MockNode::at(5.0, 5.0);
        let value: Result<(), String> = with_position_preservation(&mut node, 0.1, |_| Ok(()));
        assert!(value.is_ok());
        assert_eq!(node.set_attrs_calls, 0);
    }
}
