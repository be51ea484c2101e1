//! Store types - the contract for persisting canvas elements

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ElementId, Result, Table};

/// Options accompanying an update sent to a [`TableStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOptions {
    /// Record the change as its own undo step
    pub push_history: bool,
}

impl UpdateOptions {
    /// A user-visible commit that gets its own undo step
    pub fn commit() -> Self {
        Self { push_history: true }
    }

    /// An intermediate update folded into the surrounding undo step
    pub fn transient() -> Self {
        Self {
            push_history: false,
        }
    }
}

/// Something that owns canvas tables and re-renders them when they change
///
/// The transform controller and menu actions report every committed change
/// through this trait. Live, intermediate updates pass
/// `push_history: false` so they do not create separate undo steps.
pub trait TableStore {
    /// Replace the stored table with the given id
    fn update_element(&mut self, id: ElementId, table: &Table, options: UpdateOptions)
        -> Result<()>;

    /// Remove the element with the given id
    fn delete_element(&mut self, id: ElementId, options: UpdateOptions) -> Result<()>;
}

/// Board manifest - metadata stored alongside a board's elements
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardManifest {
    /// Schema version for forward compatibility
    pub version: u32,

    /// Board ID
    pub id: Uuid,

    /// Board name
    pub name: String,

    /// When the board was created
    pub created_at: DateTime<Utc>,

    /// When the board was last modified
    pub modified_at: DateTime<Utc>,
}

impl BoardManifest {
    /// Current schema version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a new manifest
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: Self::CURRENT_VERSION,
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            modified_at: now,
        }
    }

    /// Update the modified timestamp to now
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}
