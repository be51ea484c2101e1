//! Error types for slate-store

use slate_core::{CoreError, ElementId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    #[error("Element already exists: {0}")]
    DuplicateElement(ElementId),

    #[error("Board already exists at path: {0}")]
    BoardExists(String),

    #[error("Board has no file path")]
    NoPath,

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ElementNotFound(id) => CoreError::ElementNotFound(id),
            StoreError::Core(inner) => inner,
            other => CoreError::Store(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
