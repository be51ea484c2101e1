//! Table limits and defaults

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configured limits for table geometry
///
/// Every field has a default, so a partial JSON object (or none at all)
/// deserializes into a usable config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableConfig {
    /// Smallest width any column may shrink to
    pub min_cell_width: f64,

    /// Smallest height any row may shrink to
    pub min_cell_height: f64,

    /// Floor for the magnitude of a resize gesture's scale factor
    pub min_scale: f64,

    /// Column width used when creating a table
    pub default_col_width: f64,

    /// Row height used when creating a table
    pub default_row_height: f64,

    /// Drift (per axis, in pixels) tolerated before a position is restored
    pub position_tolerance: f64,

    /// Delay before the timer-based position check runs, in milliseconds
    pub restore_delay_ms: u64,
}

impl TableConfig {
    /// Minimum overall width of a table with `cols` columns
    pub fn min_table_width(&self, cols: usize) -> f64 {
        cols.max(1) as f64 * self.min_cell_width
    }

    /// Minimum overall height of a table with `rows` rows
    pub fn min_table_height(&self, rows: usize) -> f64 {
        rows.max(1) as f64 * self.min_cell_height
    }

    /// The restoration timer delay
    pub fn restore_delay(&self) -> Duration {
        Duration::from_millis(self.restore_delay_ms)
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_cell_width: 40.0,
            min_cell_height: 30.0,
            min_scale: 0.1,
            default_col_width: 100.0,
            default_row_height: 40.0,
            position_tolerance: 0.1,
            restore_delay_ms: 10,
        }
    }
}
