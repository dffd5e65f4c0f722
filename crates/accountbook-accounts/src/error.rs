//! Account error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Storage error: {0}")]
    Storage(#[from] accountbook_storage::StorageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate account id: {0}")]
    DuplicateId(String),
}
