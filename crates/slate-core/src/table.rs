//! Table element - a grid of text cells with explicit track sizes

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ElementId, Position, TableConfig};

/// A single table cell
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub text: String,
}

impl Cell {
    /// Create a cell holding `text`
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Create an empty cell
    pub fn empty() -> Self {
        Self::default()
    }
}

/// A table placed on the canvas
///
/// Column widths and row heights are stored per track. Outside of an
/// in-flight resize gesture `width` is the sum of `col_widths` and `height`
/// is the sum of `row_heights`. Cells are stored row-major, so the cell at
/// `(row, col)` lives at `cells[row * cols + col]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Unique identifier for this table
    pub id: ElementId,

    /// Left edge in canvas coordinates
    pub x: f64,

    /// Top edge in canvas coordinates
    pub y: f64,

    /// Overall width in pixels
    pub width: f64,

    /// Overall height in pixels
    pub height: f64,

    /// Number of rows
    pub rows: usize,

    /// Number of columns
    pub cols: usize,

    /// Width of each column, left to right
    pub col_widths: Vec<f64>,

    /// Height of each row, top to bottom
    pub row_heights: Vec<f64>,

    /// Row-major cell contents
    pub cells: Vec<Cell>,
}

impl Table {
    /// Create a table with uniform default track sizes and empty cells
    pub fn new(rows: usize, cols: usize, config: &TableConfig) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let col_width = config.default_col_width.max(config.min_cell_width);
        let row_height = config.default_row_height.max(config.min_cell_height);

        let col_widths = vec![col_width; cols];
        let row_heights = vec![row_height; rows];

        Self {
            id: ElementId::new(),
            x: 0.0,
            y: 0.0,
            width: track_sum(&col_widths),
            height: track_sum(&row_heights),
            rows,
            cols,
            col_widths,
            row_heights,
            cells: vec![Cell::empty(); rows * cols],
        }
    }

    /// Place the table at the given canvas position
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Top-left corner of the table
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Get the cell at `(row, col)`
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    /// Iterate over the cells of one row
    pub fn row_cells(&self, row: usize) -> impl Iterator<Item = &Cell> {
        let start = (row * self.cols).min(self.cells.len());
        let end = (start + self.cols).min(self.cells.len());
        self.cells[start..end].iter()
    }

    /// Set `width` and `height` to the sums of the track sizes
    pub fn recompute_size(&mut self) {
        self.width = track_sum(&self.col_widths);
        self.height = track_sum(&self.row_heights);
    }

    /// Describe every structural inconsistency without repairing it
    pub fn integrity_issues(&self, config: &TableConfig) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();

        if self.rows == 0 {
            issues.push(IntegrityIssue::NoRows);
        }
        if self.cols == 0 {
            issues.push(IntegrityIssue::NoColumns);
        }
        if self.col_widths.len() != self.cols {
            issues.push(IntegrityIssue::ColumnCount {
                expected: self.cols,
                actual: self.col_widths.len(),
            });
        }
        if self.row_heights.len() != self.rows {
            issues.push(IntegrityIssue::RowCount {
                expected: self.rows,
                actual: self.row_heights.len(),
            });
        }
        if self.cells.len() != self.rows * self.cols {
            issues.push(IntegrityIssue::CellCount {
                expected: self.rows * self.cols,
                actual: self.cells.len(),
            });
        }
        for (index, width) in self.col_widths.iter().enumerate() {
            if !is_valid_track(*width, config.min_cell_width) {
                issues.push(IntegrityIssue::NarrowColumn { index, width: *width });
            }
        }
        for (index, height) in self.row_heights.iter().enumerate() {
            if !is_valid_track(*height, config.min_cell_height) {
                issues.push(IntegrityIssue::ShortRow { index, height: *height });
            }
        }
        if self.width != track_sum(&self.col_widths) {
            issues.push(IntegrityIssue::WidthMismatch {
                stored: self.width,
                computed: track_sum(&self.col_widths),
            });
        }
        if self.height != track_sum(&self.row_heights) {
            issues.push(IntegrityIssue::HeightMismatch {
                stored: self.height,
                computed: track_sum(&self.row_heights),
            });
        }

        issues
    }

    /// Whether the table satisfies every structural invariant
    pub fn is_consistent(&self, config: &TableConfig) -> bool {
        self.integrity_issues(config).is_empty()
    }
}

/// A structural inconsistency found in a table
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrityIssue {
    NoRows,
    NoColumns,
    ColumnCount { expected: usize, actual: usize },
    RowCount { expected: usize, actual: usize },
    CellCount { expected: usize, actual: usize },
    NarrowColumn { index: usize, width: f64 },
    ShortRow { index: usize, height: f64 },
    WidthMismatch { stored: f64, computed: f64 },
    HeightMismatch { stored: f64, computed: f64 },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::NoRows => write!(f, "table has no rows"),
            IntegrityIssue::NoColumns => write!(f, "table has no columns"),
            IntegrityIssue::ColumnCount { expected, actual } => {
                write!(f, "expected {} column widths, found {}", expected, actual)
            }
            IntegrityIssue::RowCount { expected, actual } => {
                write!(f, "expected {} row heights, found {}", expected, actual)
            }
            IntegrityIssue::CellCount { expected, actual } => {
                write!(f, "expected {} cells, found {}", expected, actual)
            }
            IntegrityIssue::NarrowColumn { index, width } => {
                write!(f, "column {} is below the minimum width ({})", index, width)
            }
            IntegrityIssue::ShortRow { index, height } => {
                write!(f, "row {} is below the minimum height ({})", index, height)
            }
            IntegrityIssue::WidthMismatch { stored, computed } => {
                write!(f, "width is {} but columns sum to {}", stored, computed)
            }
            IntegrityIssue::HeightMismatch { stored, computed } => {
                write!(f, "height is {} but rows sum to {}", stored, computed)
            }
        }
    }
}

/// Repair a table whose track and cell arrays disagree with its counts
///
/// Missing tracks are padded with the configured minimum, missing cells with
/// empty cells, and extras are truncated. Tracks below the minimum are raised
/// to it, and the overall size is recomputed from the tracks. Applying this
/// twice gives the same table as applying it once.
pub fn validate_integrity(table: &Table, config: &TableConfig) -> Table {
    let mut repaired = table.clone();

    repaired.rows = repaired.rows.max(1);
    repaired.cols = repaired.cols.max(1);

    repaired
        .col_widths
        .resize(repaired.cols, config.min_cell_width);
    repaired
        .row_heights
        .resize(repaired.rows, config.min_cell_height);
    repaired
        .cells
        .resize(repaired.rows * repaired.cols, Cell::empty());

    for width in repaired.col_widths.iter_mut() {
        *width = repair_track(*width, config.min_cell_width);
    }
    for height in repaired.row_heights.iter_mut() {
        *height = repair_track(*height, config.min_cell_height);
    }

    repaired.recompute_size();

    if repaired != *table {
        debug!(
            "Repaired table {} to {}x{} ({}x{}px)",
            table.id, repaired.rows, repaired.cols, repaired.width, repaired.height
        );
    }

    repaired
}

/// Sum of a sequence of track sizes
pub fn track_sum(sizes: &[f64]) -> f64 {
    sizes.iter().sum()
}

fn is_valid_track(size: f64, minimum: f64) -> bool {
    size.is_finite() && size >= minimum
}

fn repair_track(size: f64, minimum: f64) -> f64 {
    if is_valid_track(size, minimum) {
        size
    } else {
        minimum
    }
}
