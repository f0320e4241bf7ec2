//! Capability-based access control for list operations.
//!
//! [`evaluate`] is a pure decision function over (actor, list, capability):
//! no I/O, no side effects. Callers check existence first (a missing list is
//! NotFound regardless of actor), then evaluate, then apply the mutation
//! only after an allow. Authorization failures never reveal why: the single
//! [`AccessError::CapabilityDenied`] covers owner, collaborator and stranger
//! alike.

pub mod errors;

pub use errors::AccessError;

use crate::list::{List, Permission, UserId};

/// The caller on whose behalf a request runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// No credential presented. May still read.
    Anonymous,
    /// A credential verified by the external identity provider.
    User(UserId),
}

impl Actor {
    /// The user id behind this actor, if authenticated.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Actor::Anonymous => None,
            Actor::User(id) => Some(id),
        }
    }

    /// The user id behind this actor, or `AuthenticationRequired`.
    pub fn require_user(&self) -> Result<&UserId, AccessError> {
        self.user_id().ok_or(AccessError::AuthenticationRequired)
    }
}

impl From<UserId> for Actor {
    fn from(id: UserId) -> Self {
        Actor::User(id)
    }
}

/// One class of operation on a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Fetch the list and its contents.
    Read,
    /// Rename the list.
    EditMetadata,
    /// Create, update, delete and reorder items.
    EditItems,
    /// Add, remove and re-permission collaborators.
    ManageCollaborators,
    /// Set or toggle the archived flag.
    Archive,
    /// Set or toggle the pinned flag.
    Pin,
    /// Destroy the list.
    Delete,
}

impl Capability {
    /// Whether this capability is granted to every caller, even anonymous ones.
    fn is_public(self) -> bool {
        matches!(self, Capability::Read)
    }
}

/// Decide whether `actor` may exercise `capability` on `list`.
///
/// * `Read` is always allowed, including for [`Actor::Anonymous`].
/// * `EditItems` is allowed for the owner and for collaborators holding
///   [`Permission::Edit`].
/// * Every other capability is owner-only.
///
/// # Errors
/// * `AccessError::AuthenticationRequired` for an anonymous actor on a
///   non-public capability
/// * `AccessError::CapabilityDenied` for an authenticated actor without the
///   capability
pub fn evaluate(actor: &Actor, list: &List, capability: Capability) -> Result<(), AccessError> {
    if capability.is_public() {
        return Ok(());
    }

    let user = actor.require_user()?;

    let allowed = match capability {
        Capability::Read => true,
        Capability::EditItems => {
            list.is_owner(user) || list.permission_of(user) == Some(Permission::Edit)
        }
        Capability::EditMetadata
        | Capability::ManageCollaborators
        | Capability::Archive
        | Capability::Pin
        | Capability::Delete => list.is_owner(user),
    };

    if allowed {
        Ok(())
    } else {
        Err(AccessError::CapabilityDenied)
    }
}
