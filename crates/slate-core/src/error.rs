//! Error types for slate-core

use thiserror::Error;

use crate::ElementId;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    #[error("Store rejected update: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
