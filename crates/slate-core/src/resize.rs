//! Scale-resize calculation
//!
//! An interactive resize leaves the visual node with a scale factor. These
//! functions turn that factor into concrete column widths and row heights,
//! honouring per-track minimums without letting the aggregate size stall
//! once a single track reaches its floor.

use tracing::trace;

use crate::{track_sum, Position, ResetAttrs, Scale, Table, TableConfig};

/// Residual (in pixels) below which the rescaled total is accepted as is
const RESIDUAL_TOLERANCE: f64 = 0.5;

/// Options for [`apply_table_scale_resize`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleResizeOptions {
    /// Collapse both axes to a single uniform scale
    pub keep_aspect_ratio: bool,

    /// Floor for the magnitude of the horizontal scale
    pub min_scale_x: f64,

    /// Floor for the magnitude of the vertical scale
    pub min_scale_y: f64,
}

impl ScaleResizeOptions {
    /// Options using the scale floor from `config`
    pub fn from_config(config: &TableConfig) -> Self {
        Self {
            keep_aspect_ratio: false,
            min_scale_x: config.min_scale,
            min_scale_y: config.min_scale,
        }
    }

    /// Lock or unlock the aspect ratio
    pub fn with_aspect_ratio(mut self, keep: bool) -> Self {
        self.keep_aspect_ratio = keep;
        self
    }
}

impl Default for ScaleResizeOptions {
    fn default() -> Self {
        Self::from_config(&TableConfig::default())
    }
}

/// Scale every track by `scale`, keeping each at or above `minimum`
///
/// When a minimum clamps some tracks, the remaining tracks absorb the
/// difference so the total keeps tracking `sum(sizes) * scale` as closely as
/// the minimums allow.
pub fn rescale_with_minimums(sizes: &[f64], scale: f64, minimum: f64) -> Vec<f64> {
    if sizes.is_empty() {
        return Vec::new();
    }

    let mut proposed: Vec<f64> = sizes
        .iter()
        .map(|size| (size * scale).max(minimum))
        .collect();

    let target_sum = track_sum(sizes) * scale;
    let proposed_sum = track_sum(&proposed);

    if proposed_sum == 0.0 {
        return vec![minimum; sizes.len()];
    }

    if !approx_eq(proposed_sum, target_sum) {
        let correction = target_sum / proposed_sum;
        for value in proposed.iter_mut() {
            *value = (*value * correction).max(minimum);
        }
    }

    let residual = target_sum - track_sum(&proposed);
    if residual.abs() > RESIDUAL_TOLERANCE {
        let flexible = proposed.iter().filter(|value| **value > minimum).count();
        if flexible > 0 {
            let share = residual / flexible as f64;
            for value in proposed.iter_mut().filter(|value| **value > minimum) {
                *value = (*value + share).max(minimum);
            }
        }
    }

    trace!(
        "Rescaled {} tracks by {} (target {}, result {})",
        sizes.len(),
        scale,
        target_sum,
        track_sum(&proposed)
    );

    proposed
}

/// Clamp the magnitude of `scale` to at least `floor`, preserving its sign
pub fn clamp_scale(scale: f64, floor: f64) -> f64 {
    if scale.abs() < floor {
        if scale < 0.0 {
            -floor
        } else {
            floor
        }
    } else {
        scale
    }
}

/// Resolve the scale a gesture actually applies after locking and clamping
pub fn effective_scale(scale: Scale, options: &ScaleResizeOptions) -> Scale {
    let scale = if options.keep_aspect_ratio {
        scale.uniform()
    } else {
        scale
    };

    Scale::new(
        clamp_scale(scale.scale_x, options.min_scale_x),
        clamp_scale(scale.scale_y, options.min_scale_y),
    )
}

/// Apply a gesture's scale factors to a table's tracks
///
/// Columns are rescaled with `scale_x` and rows with `scale_y`; cells are
/// left untouched. Track sizes use the scale's magnitude, so a mirrored
/// gesture resizes the table without producing negative sizes.
pub fn apply_table_scale_resize(
    table: &Table,
    scale_x: f64,
    scale_y: f64,
    options: &ScaleResizeOptions,
    config: &TableConfig,
) -> Table {
    let scale = effective_scale(Scale::new(scale_x, scale_y), options);

    let mut resized = table.clone();
    resized.col_widths = rescale_with_minimums(
        &table.col_widths,
        scale.scale_x.abs(),
        config.min_cell_width,
    );
    resized.row_heights = rescale_with_minimums(
        &table.row_heights,
        scale.scale_y.abs(),
        config.min_cell_height,
    );
    resized.recompute_size();
    resized
}

/// Compute the committed table and node reset for the end of a gesture
///
/// The returned table adopts `node_position`; the reset attributes carry the
/// new size at scale 1, ready to be applied to the visual node.
pub fn plan_transform_commit(
    table: &Table,
    final_scale: Scale,
    node_position: Position,
    options: &ScaleResizeOptions,
    config: &TableConfig,
) -> (Table, ResetAttrs) {
    let mut committed = apply_table_scale_resize(
        table,
        final_scale.scale_x,
        final_scale.scale_y,
        options,
        config,
    );
    committed.x = node_position.x;
    committed.y = node_position.y;

    let reset = ResetAttrs::new(node_position, committed.width, committed.height);
    (committed, reset)
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}
