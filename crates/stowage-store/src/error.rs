//! Error types for the Stowage slot store.

use thiserror::Error;

/// Result type alias for slot store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing slots.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("storage lock poisoned")]
    Poisoned,
}
