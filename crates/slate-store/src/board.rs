//! Board store - the tables on one canvas, with undo history
//!
//! A board is persisted as a single pretty-printed JSON file:
//! ```text
//! {
//!   "manifest": { "version": 1, "id": ..., "name": ..., ... },
//!   "config":   { "minCellWidth": 40, ... },
//!   "tables":   [ { "id": ..., "colWidths": [...], ... } ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use slate_core::{
    validate_integrity, BoardManifest, ElementId, IntegrityIssue, Table, TableConfig, TableStore,
    UpdateOptions,
};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::History;

/// On-disk representation of a board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardFile {
    pub manifest: BoardManifest,

    #[serde(default)]
    pub config: TableConfig,

    #[serde(default)]
    pub tables: Vec<Table>,
}

/// The tables on one board, in drawing order
pub struct BoardStore {
    /// Path to the board file, if the board is persisted
    pub path: Option<PathBuf>,

    manifest: BoardManifest,

    config: TableConfig,

    tables: Vec<Table>,

    history: History<Vec<Table>>,

    /// Problems found in the file as written, by table
    load_issues: Vec<(ElementId, Vec<IntegrityIssue>)>,

    /// Whether there are changes not yet written to disk
    dirty: bool,
}

impl BoardStore {
    /// Create an empty in-memory board
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, TableConfig::default())
    }

    /// Create an empty in-memory board with custom limits
    pub fn with_config(name: impl Into<String>, config: TableConfig) -> Self {
        Self {
            path: None,
            manifest: BoardManifest::new(name),
            config,
            tables: Vec::new(),
            history: History::default(),
            load_issues: Vec::new(),
            dirty: false,
        }
    }

    /// Create a new board file at the given path
    pub async fn create(path: impl AsRef<Path>, name: impl Into<String>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if path.exists() {
            return Err(StoreError::BoardExists(path.display().to_string()));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut board = Self::new(name);
        board.path = Some(path.clone());
        board.dirty = true;
        board.flush().await?;

        info!("Created board '{}' at {:?}", board.manifest.name, path);
        Ok(board)
    }

    /// Open an existing board file
    ///
    /// Tables that fail integrity checks are repaired on load; the repair is
    /// written back on the next flush. What was wrong with them is kept in
    /// [`BoardStore::load_issues`].
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let json = fs::read_to_string(&path).await?;
        let file: BoardFile = serde_json::from_str(&json)?;

        let mut dirty = false;
        let mut load_issues = Vec::new();
        let mut tables = Vec::with_capacity(file.tables.len());
        for table in &file.tables {
            let issues = table.integrity_issues(&file.config);
            let repaired = validate_integrity(table, &file.config);
            if !issues.is_empty() || repaired != *table {
                warn!(
                    "Repaired inconsistent table {} on load ({} issues)",
                    table.id,
                    issues.len()
                );
                dirty = true;
            }
            if !issues.is_empty() {
                load_issues.push((table.id, issues));
            }
            tables.push(repaired);
        }

        info!("Opened board '{}' from {:?}", file.manifest.name, path);

        Ok(Self {
            path: Some(path),
            manifest: file.manifest,
            config: file.config,
            tables,
            history: History::default(),
            load_issues,
            dirty,
        })
    }

    /// Write the board to its file if anything changed
    pub async fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let path = self.path.clone().ok_or(StoreError::NoPath)?;

        let file = BoardFile {
            manifest: self.manifest.clone(),
            config: self.config.clone(),
            tables: self.tables.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(&path, json).await?;

        self.dirty = false;
        debug!("Flushed board {} to {:?}", self.manifest.id, path);
        Ok(())
    }

    /// Save the board to a new path and keep using that path
    pub async fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.path = Some(path.as_ref().to_path_buf());
        self.dirty = true;
        self.flush().await
    }

    /// Integrity problems the board file had when it was opened
    ///
    /// The tables themselves were repaired on load, so this is the only
    /// record of how the file was written.
    pub fn load_issues(&self) -> &[(ElementId, Vec<IntegrityIssue>)] {
        &self.load_issues
    }

    pub fn manifest(&self) -> &BoardManifest {
        &self.manifest
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// All tables, in drawing order
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Get a table by ID
    pub fn get_table(&self, id: ElementId) -> Result<&Table> {
        self.tables
            .iter()
            .find(|table| table.id == id)
            .ok_or(StoreError::ElementNotFound(id))
    }

    /// Find a table whose ID starts with `prefix`
    ///
    /// Returns `None` when no table or more than one table matches.
    pub fn find_by_prefix(&self, prefix: &str) -> Option<&Table> {
        let mut matches = self
            .tables
            .iter()
            .filter(|table| table.id.to_string().starts_with(prefix));
        let first = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        Some(first)
    }

    /// Add a table on top of the others, as its own undo step
    pub fn insert_table(&mut self, table: Table) -> Result<ElementId> {
        if self.tables.iter().any(|existing| existing.id == table.id) {
            return Err(StoreError::DuplicateElement(table.id));
        }

        let id = table.id;
        self.checkpoint(UpdateOptions::commit());
        self.tables.push(validate_integrity(&table, &self.config));
        self.mark_dirty();

        debug!("Inserted table {} into board {}", id, self.manifest.id);
        Ok(id)
    }

    /// Replace a table
    pub fn update_table(
        &mut self,
        id: ElementId,
        table: &Table,
        options: UpdateOptions,
    ) -> Result<()> {
        let index = self.index_of(id)?;
        self.checkpoint(options);
        self.tables[index] = table.clone();
        self.mark_dirty();

        debug!("Updated table {} (history: {})", id, options.push_history);
        Ok(())
    }

    /// Remove a table
    pub fn remove_table(&mut self, id: ElementId, options: UpdateOptions) -> Result<Table> {
        let index = self.index_of(id)?;
        self.checkpoint(options);
        let removed = self.tables.remove(index);
        self.mark_dirty();

        debug!("Removed table {} from board {}", id, self.manifest.id);
        Ok(removed)
    }

    /// Repair every table, returning how many needed it
    ///
    /// Repairs are recorded as a single undo step.
    pub fn repair_all(&mut self) -> usize {
        let repaired: Vec<Table> = self
            .tables
            .iter()
            .map(|table| validate_integrity(table, &self.config))
            .collect();
        let changed = repaired
            .iter()
            .zip(self.tables.iter())
            .filter(|(after, before)| after != before)
            .count();

        if changed > 0 {
            self.checkpoint(UpdateOptions::commit());
            self.tables = repaired;
            self.mark_dirty();
            info!("Repaired {} tables on board {}", changed, self.manifest.id);
        }
        changed
    }

    /// Undo the latest committed change
    pub fn undo(&mut self) -> Result<()> {
        let current = self.tables.clone();
        let previous = self.history.undo(current).ok_or(StoreError::NothingToUndo)?;
        self.tables = previous;
        self.mark_dirty();
        Ok(())
    }

    /// Redo the latest undone change
    pub fn redo(&mut self) -> Result<()> {
        let current = self.tables.clone();
        let next = self.history.redo(current).ok_or(StoreError::NothingToRedo)?;
        self.tables = next;
        self.mark_dirty();
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Whether there are changes not yet written to disk
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn index_of(&self, id: ElementId) -> Result<usize> {
        self.tables
            .iter()
            .position(|table| table.id == id)
            .ok_or(StoreError::ElementNotFound(id))
    }

    /// Record an undo step for a committed change
    ///
    /// Transient changes merge into the current step but still invalidate
    /// redo, since the redone state would overwrite them.
    fn checkpoint(&mut self, options: UpdateOptions) {
        if options.push_history {
            self.history.record(self.tables.clone());
        } else {
            self.history.discard_redo();
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.manifest.touch();
    }
}

impl TableStore for BoardStore {
    fn update_element(
        &mut self,
        id: ElementId,
        table: &Table,
        options: UpdateOptions,
    ) -> slate_core::Result<()> {
        Ok(self.update_table(id, table, options)?)
    }

    fn delete_element(&mut self, id: ElementId, options: UpdateOptions) -> slate_core::Result<()> {
        self.remove_table(id, options)?;
        Ok(())
    }
}
