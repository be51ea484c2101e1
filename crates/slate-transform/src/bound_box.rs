//! Live bounding-box constraint for table resizes
//!
//! The host consults the installed constraint on every resize frame with the
//! previous box and the proposed one. The constraint always answers with a
//! clamped version of the proposed box. Answering with the previous box
//! makes the host treat that dimension as frozen, and it stops delivering
//! shrink deltas in that direction.

use slate_core::{BoundBox, Table, TableConfig};
use tracing::trace;

use crate::ModifierState;

/// Edge movement (in pixels) below which an edge counts as anchored
const EDGE_EPSILON: f64 = 1e-6;

/// Size limits for one table, derived from its current structure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableBoundBox {
    /// `cols * min_cell_width`
    pub min_width: f64,

    /// `rows * min_cell_height`
    pub min_height: f64,

    /// Width over height of the table when the constraint was built
    pub aspect_ratio: f64,
}

impl TableBoundBox {
    /// Build the constraint for `table` as it currently is
    pub fn for_table(table: &Table, config: &TableConfig) -> Self {
        let aspect_ratio = if table.width > 0.0 && table.height > 0.0 {
            table.width / table.height
        } else {
            1.0
        };

        Self {
            min_width: config.min_table_width(table.cols),
            min_height: config.min_table_height(table.rows),
            aspect_ratio,
        }
    }

    /// Clamp a proposed box against the table's limits
    ///
    /// With the aspect lock held, the axis whose scale ratio moved furthest
    /// from 1 drives the gesture and the other axis is recomputed from the
    /// stored aspect ratio. When the left or top edge is being dragged, the
    /// opposite edge stays where the proposal put it.
    pub fn constrain(&self, old: BoundBox, new: BoundBox, modifiers: ModifierState) -> BoundBox {
        let mut width = new.width;
        let mut height = new.height;

        if modifiers.keep_aspect_ratio() {
            let ratio_x = scale_ratio(old.width, new.width);
            let ratio_y = scale_ratio(old.height, new.height);

            if (ratio_x - 1.0).abs() >= (ratio_y - 1.0).abs() {
                height = width / self.aspect_ratio;
            } else {
                width = height * self.aspect_ratio;
            }

            let grow = (self.min_width / width)
                .max(self.min_height / height)
                .max(1.0);
            if grow.is_finite() {
                width *= grow;
                height *= grow;
            } else {
                width = self.min_width.max(self.min_height * self.aspect_ratio);
                height = width / self.aspect_ratio;
            }
        }

        if !(width >= self.min_width) {
            width = self.min_width;
        }
        if !(height >= self.min_height) {
            height = self.min_height;
        }

        let x = if (new.x - old.x).abs() > EDGE_EPSILON {
            new.right() - width
        } else {
            new.x
        };
        let y = if (new.y - old.y).abs() > EDGE_EPSILON {
            new.bottom() - height
        } else {
            new.y
        };

        let constrained = BoundBox::new(x, y, width, height);
        if constrained != new {
            trace!("Constrained resize box {:?} -> {:?}", new, constrained);
        }
        constrained
    }
}

/// Build the bounding-box function for `table`
///
/// The returned closure takes `(old, new, modifiers)` and returns the box the
/// node should adopt.
pub fn create_table_bound_box_func(
    table: &Table,
    config: &TableConfig,
) -> impl Fn(BoundBox, BoundBox, ModifierState) -> BoundBox {
    let constraint = TableBoundBox::for_table(table, config);
    move |old, new, modifiers| constraint.constrain(old, new, modifiers)
}

/// The host side that accepts a replacement bounding-box constraint
pub trait ConstraintInstaller {
    fn install_bound_box(&mut self, constraint: TableBoundBox);
}

fn scale_ratio(old: f64, new: f64) -> f64 {
    if old.abs() > f64::EPSILON {
        new / old
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint() -> TableBoundBox {
        // 3 columns x 2 rows at the default 100x40 tracks
        let config = TableConfig::default();
        TableBoundBox::for_table(&Table::new(2, 3, &config), &config)
    }

    #[test]
    fn test_limits_follow_structure() {
        let bound = constraint();
        assert_eq!(bound.min_width, 120.0);
        assert_eq!(bound.min_height, 60.0);
        assert_eq!(bound.aspect_ratio, 300.0 / 80.0);
    }

    #[test]
    fn test_valid_proposal_passes_through() {
        let old = BoundBox::new(0.0, 0.0, 300.0, 80.0);
        let new = BoundBox::new(0.0, 0.0, 250.0, 90.0);
        assert_eq!(constraint().constrain(old, new, ModifierState::NONE), new);
    }

    #[test]
    fn test_shrink_below_minimum_clamps_new_box() {
        let old = BoundBox::new(0.0, 0.0, 125.0, 80.0);
        let new = BoundBox::new(0.0, 10.0, 100.0, 70.0);
        let result = constraint().constrain(old, new, ModifierState::NONE);

        assert_eq!(result.width, 120.0);
        // the height change is kept, never reverted to the old box
        assert_eq!(result.height, 70.0);
        assert_eq!(result.y, 10.0);
        assert_ne!(result, old);
    }

    #[test]
    fn test_left_edge_clamp_keeps_right_edge() {
        let old = BoundBox::new(0.0, 0.0, 130.0, 80.0);
        let new = BoundBox::new(30.0, 0.0, 100.0, 80.0);
        let result = constraint().constrain(old, new, ModifierState::NONE);

        assert_eq!(result.width, 120.0);
        assert_eq!(result.x, 10.0);
        assert_eq!(result.right(), new.right());
    }

    #[test]
    fn test_repeated_shrink_keeps_answering() {
        let bound = constraint();
        let mut current = BoundBox::new(0.0, 0.0, 300.0, 80.0);
        for _ in 0..20 {
            let proposed = BoundBox::new(
                current.x,
                current.y,
                current.width - 20.0,
                current.height - 5.0,
            );
            let next = bound.constrain(current, proposed, ModifierState::NONE);
            assert!(next.width >= 120.0 && next.height >= 60.0);
            current = next;
        }
        assert_eq!(current.width, 120.0);
        assert_eq!(current.height, 60.0);
    }

    #[test]
    fn test_aspect_lock_follows_dominant_axis() {
        let bound = constraint();
        let old = BoundBox::new(0.0, 0.0, 300.0, 80.0);

        let wide = BoundBox::new(0.0, 0.0, 600.0, 90.0);
        let result = bound.constrain(old, wide, ModifierState::shift());
        assert_eq!(result.width, 600.0);
        assert!((result.height - 160.0).abs() < 1e-9);

        let tall = BoundBox::new(0.0, 0.0, 310.0, 160.0);
        let result = bound.constrain(old, tall, ModifierState::shift());
        assert!((result.width - 600.0).abs() < 1e-9);
        assert_eq!(result.height, 160.0);
    }

    #[test]
    fn test_aspect_lock_respects_minimums() {
        let bound = constraint();
        let old = BoundBox::new(0.0, 0.0, 300.0, 80.0);
        let tiny = BoundBox::new(0.0, 0.0, 30.0, 8.0);
        let result = bound.constrain(old, tiny, ModifierState::shift());

        assert!(result.width >= bound.min_width);
        assert!(result.height >= bound.min_height - 1e-9);
        assert!((result.width / result.height - bound.aspect_ratio).abs() < 1e-9);
    }

    #[test]
    fn test_bound_box_func_closure() {
        let config = TableConfig::default();
        let func = create_table_bound_box_func(&Table::new(1, 1, &config), &config);
        let old = BoundBox::new(0.0, 0.0, 100.0, 40.0);
        let result = func(old, BoundBox::new(0.0, 0.0, 10.0, 10.0), ModifierState::NONE);
        assert_eq!(result, BoundBox::new(0.0, 0.0, 40.0, 30.0));
    }
}
