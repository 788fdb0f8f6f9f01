//! Error types for synced cells.

use stowage_store::StoreError;
use thiserror::Error;

/// Result type alias for cell operations.
pub type CellResult<T> = Result<T, CellError>;

/// Failures a cell can run into.
///
/// Only [`CellError::EmptyKey`] is ever returned to a caller. The rest are
/// absorbed by the cell and reported through [`crate::CellOptions`] hooks.
#[derive(Debug, Error)]
pub enum CellError {
    #[error("cell key must not be empty")]
    EmptyKey,

    #[error("stored value for {key:?} could not be decoded: {message}")]
    Decode { key: String, message: String },

    #[error("value for {key:?} could not be encoded: {message}")]
    Encode { key: String, message: String },

    #[error("storage error for {key:?}: {source}")]
    Storage {
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("subscriber {subscriber} of {key:?} failed: {message}")]
    Observer {
        key: String,
        subscriber: u64,
        message: String,
    },
}

impl CellError {
    /// The cell key the failure belongs to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            CellError::EmptyKey => None,
            CellError::Decode { key, .. }
            | CellError::Encode { key, .. }
            | CellError::Storage { key, .. }
            | CellError::Observer { key, .. } => Some(key),
        }
    }
}
