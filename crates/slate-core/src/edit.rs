//! Structural edits - adding and removing rows and columns
//!
//! Every operation takes a table and returns a new one. Requests that would
//! leave a table without rows or columns return the input unchanged.
//!
//! Indices are checked against the track arrays as well as the counts, so a
//! table whose counts disagree with its arrays is edited without panicking.
//! Such a table stays inconsistent until it is repaired.

use tracing::debug;

use crate::{Cell, Table, TableConfig};

/// Insert a row at `insert_index` (appends when `None` or past the end)
///
/// The new row's height is the current height spread over one more row,
/// never below the configured minimum.
pub fn add_row(table: &Table, insert_index: Option<usize>, config: &TableConfig) -> Table {
    let index = insert_index
        .unwrap_or(table.rows)
        .min(table.rows)
        .min(table.row_heights.len());
    let row_height = new_track_size(table.height, table.rows, config.min_cell_height);

    let mut edited = table.clone();
    edited.row_heights.insert(index, row_height);

    let offset = (index * table.cols).min(edited.cells.len());
    edited.cells.splice(
        offset..offset,
        std::iter::repeat_with(Cell::empty).take(table.cols),
    );

    edited.rows += 1;
    edited.recompute_size();

    debug!("Added row {} to table {} ({}px)", index, table.id, row_height);
    edited
}

/// Insert a column at `insert_index` (appends when `None` or past the end)
///
/// One empty cell is inserted inside every row, so the flattened array keeps
/// its row-major layout.
pub fn add_column(table: &Table, insert_index: Option<usize>, config: &TableConfig) -> Table {
    let index = insert_index
        .unwrap_or(table.cols)
        .min(table.cols)
        .min(table.col_widths.len());
    let col_width = new_track_size(table.width, table.cols, config.min_cell_width);

    let mut edited = table.clone();
    edited.col_widths.insert(index, col_width);

    let new_cols = table.cols + 1;
    let mut cells = Vec::with_capacity(table.rows * new_cols);
    for row in 0..table.rows {
        let mut row_cells: Vec<Cell> = table.row_cells(row).cloned().collect();
        row_cells.insert(index.min(row_cells.len()), Cell::empty());
        cells.extend(row_cells);
    }
    edited.cells = cells;

    edited.cols = new_cols;
    edited.recompute_size();

    debug!("Added column {} to table {} ({}px)", index, table.id, col_width);
    edited
}

/// Remove the row at `row_index`
///
/// Returns the table unchanged when it has a single row or the index is out
/// of range.
pub fn remove_row(table: &Table, row_index: usize) -> Table {
    if table.rows <= 1 || row_index >= table.rows || row_index >= table.row_heights.len() {
        return table.clone();
    }

    let mut edited = table.clone();
    edited.row_heights.remove(row_index);

    let start = (row_index * table.cols).min(edited.cells.len());
    let end = (start + table.cols).min(edited.cells.len());
    edited.cells.drain(start..end);

    edited.rows -= 1;
    edited.recompute_size();

    debug!("Removed row {} from table {}", row_index, table.id);
    edited
}

/// Remove the column at `col_index`
///
/// Returns the table unchanged when it has a single column or the index is
/// out of range.
pub fn remove_column(table: &Table, col_index: usize) -> Table {
    if table.cols <= 1 || col_index >= table.cols || col_index >= table.col_widths.len() {
        return table.clone();
    }

    let mut edited = table.clone();
    edited.col_widths.remove(col_index);
    edited.cells = table
        .cells
        .iter()
        .enumerate()
        .filter(|(position, _)| position % table.cols != col_index)
        .map(|(_, cell)| cell.clone())
        .collect();

    edited.cols -= 1;
    edited.recompute_size();

    debug!("Removed column {} from table {}", col_index, table.id);
    edited
}

/// Replace the text of the cell at `(row, col)`
///
/// Out-of-range coordinates leave the table unchanged.
pub fn set_cell_text(table: &Table, row: usize, col: usize, text: impl Into<String>) -> Table {
    let mut edited = table.clone();
    if row < table.rows && col < table.cols {
        if let Some(cell) = edited.cells.get_mut(row * table.cols + col) {
            cell.text = text.into();
        }
    }
    edited
}

fn new_track_size(total: f64, count: usize, minimum: f64) -> f64 {
    (total / (count + 1) as f64).round().max(minimum)
}
