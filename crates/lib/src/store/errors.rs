//! Persistence error types.

use thiserror::Error;

use crate::list::ListId;

/// Errors returned by list aggregate stores.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// No aggregate exists under this list id
    #[error("List '{id}' not found")]
    ListNotFound { id: ListId },

    /// The id minter kept colliding with existing lists
    #[error("Could not mint a fresh list id after {attempts} attempts")]
    IdSpaceExhausted { attempts: usize },

    /// Whole-state persistence failed to encode or decode
    #[error("Persistence serialization failed: {reason}")]
    SerializationFailed { reason: String },

    /// Whole-state persistence hit an I/O failure
    #[error("Persistence I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::ListNotFound { .. })
    }
}

// Conversion to the main Error type
impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store(err)
    }
}
