//! Identity provider error types.

use thiserror::Error;

/// Errors from the external identity provider.
///
/// Negative lookups (unknown token, unknown handle) are not errors; they are
/// `Ok(None)` answers. This type only covers the provider itself failing.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The provider could not be consulted
    #[error("Identity provider unavailable: {reason}")]
    Unavailable { reason: String },
}

// Conversion to the main Error type
impl From<DirectoryError> for crate::Error {
    fn from(err: DirectoryError) -> Self {
        crate::Error::Identity(err)
    }
}
