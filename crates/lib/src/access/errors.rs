//! Access-control error types.

use thiserror::Error;

/// Errors returned by the capability evaluator.
///
/// The two variants map onto the two distinct client-facing failures:
/// "present a credential first" and "your credential is not enough". The
/// latter deliberately carries no detail about *why* the capability was
/// denied (owner vs. collaborator vs. stranger).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AccessError {
    /// The capability requires an authenticated actor, and none was presented
    #[error("Authentication required")]
    AuthenticationRequired,

    /// The authenticated actor lacks the required capability
    #[error("Insufficient capability")]
    CapabilityDenied,
}

impl AccessError {
    /// Check if this error indicates a missing or invalid credential.
    pub fn is_authentication_error(&self) -> bool {
        matches!(self, AccessError::AuthenticationRequired)
    }

    /// Check if this error indicates an authenticated caller lacked capability.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, AccessError::CapabilityDenied)
    }
}

// Conversion to the main Error type
impl From<AccessError> for crate::Error {
    fn from(err: AccessError) -> Self {
        crate::Error::Access(err)
    }
}
