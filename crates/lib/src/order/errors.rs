//! Reorder error types.

use thiserror::Error;

/// Errors returned by the position-reconciliation engine.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum OrderError {
    /// The desired order names ids that do not exist in the scope being reordered
    #[error("Unknown identifiers in reorder set: {}", ids.join(", "))]
    UnknownIdentifiers { ids: Vec<String> },
}

// Conversion to the main Error type
impl From<OrderError> for crate::Error {
    fn from(err: OrderError) -> Self {
        crate::Error::Order(err)
    }
}
