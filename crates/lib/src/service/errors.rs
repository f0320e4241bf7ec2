//! Service-level error types.

use thiserror::Error;

/// Errors raised by the service layer itself.
///
/// Most failures surface from the modules the service composes (access,
/// store, list, order); this covers only what originates here.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The external identity lookup found no user behind the handle
    #[error("No user found for '{handle}'")]
    UserNotFound { handle: String },
}

impl ServiceError {
    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::UserNotFound { .. })
    }

    /// Check if this error is validation-related.
    pub fn is_validation_error(&self) -> bool {
        false
    }
}

// Conversion to the main Error type
impl From<ServiceError> for crate::Error {
    fn from(err: ServiceError) -> Self {
        crate::Error::Service(err)
    }
}
