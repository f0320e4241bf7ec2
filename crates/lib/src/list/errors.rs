//! Errors for list aggregate operations.
//!
//! These cover the collaboration registry and embedded-item lookups. Storage
//! failures live in `store::errors`; authorization failures in
//! `access::errors`.

use thiserror::Error;

use super::{ItemId, UserId};

/// Errors arising from operations on a [`super::List`] aggregate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ListError {
    /// The user already holds a collaboration entry on this list
    #[error("User '{user}' is already a collaborator")]
    AlreadyCollaborator { user: UserId },

    /// The list owner cannot also be a collaborator
    #[error("The list owner cannot be added as a collaborator")]
    OwnerCannotCollaborate,

    /// The user holds no collaboration entry on this list
    #[error("User '{user}' is not a collaborator")]
    NotCollaborator { user: UserId },

    /// A permission string was not one of the known levels
    #[error("Invalid permission '{given}', expected 'view' or 'edit'")]
    InvalidPermission { given: String },

    /// No item with this id exists in the list
    #[error("Item '{item}' not found")]
    ItemNotFound { item: ItemId },
}

impl ListError {
    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ListError::NotCollaborator { .. } | ListError::ItemNotFound { .. }
        )
    }

    /// Check if this error indicates a conflict with existing state.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ListError::AlreadyCollaborator { .. })
    }

    /// Check if this error is validation-related.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ListError::OwnerCannotCollaborate | ListError::InvalidPermission { .. }
        )
    }
}

// Conversion to the main Error type
impl From<ListError> for crate::Error {
    fn from(err: ListError) -> Self {
        crate::Error::List(err)
    }
}
