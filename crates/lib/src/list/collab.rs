//! Collaboration registry mutations on the list aggregate.
//!
//! The registry is a per-list user→permission map embedded in the aggregate.
//! These methods uphold its two invariants: entries are unique by user id,
//! and the owner never appears among them. They also carry the archive side
//! effect: archiving evicts every collaborator, and unarchiving does not
//! restore them.

use super::{Collaborator, List, ListError, Permission, UserId};

impl List {
    /// Add a collaboration entry for `user_id`.
    ///
    /// # Errors
    /// * `ListError::OwnerCannotCollaborate` if `user_id` is the owner
    /// * `ListError::AlreadyCollaborator` if an entry already exists
    pub fn add_collaborator(
        &mut self,
        user_id: UserId,
        permission: Permission,
    ) -> Result<(), ListError> {
        if self.is_owner(&user_id) {
            return Err(ListError::OwnerCannotCollaborate);
        }
        if self.permission_of(&user_id).is_some() {
            return Err(ListError::AlreadyCollaborator { user: user_id });
        }
        self.collaborators_mut().push(Collaborator {
            user_id,
            permission,
        });
        Ok(())
    }

    /// Remove the collaboration entry for `user_id`.
    ///
    /// # Errors
    /// * `ListError::NotCollaborator` if no entry exists
    pub fn remove_collaborator(&mut self, user_id: &UserId) -> Result<(), ListError> {
        let collaborators = self.collaborators_mut();
        let before = collaborators.len();
        collaborators.retain(|c| &c.user_id != user_id);
        if collaborators.len() == before {
            return Err(ListError::NotCollaborator {
                user: user_id.clone(),
            });
        }
        Ok(())
    }

    /// Change the permission of an existing collaboration entry.
    ///
    /// # Errors
    /// * `ListError::NotCollaborator` if no entry exists
    pub fn set_permission(
        &mut self,
        user_id: &UserId,
        permission: Permission,
    ) -> Result<(), ListError> {
        match self
            .collaborators_mut()
            .iter_mut()
            .find(|c| &c.user_id == user_id)
        {
            Some(entry) => {
                entry.permission = permission;
                Ok(())
            }
            None => Err(ListError::NotCollaborator {
                user: user_id.clone(),
            }),
        }
    }

    /// Set the archived flag.
    ///
    /// Transitioning to `true` clears the collaboration registry as a side
    /// effect. Transitioning back does not restore it; evicted collaborators
    /// must be re-added explicitly.
    pub fn set_archived(&mut self, archived: bool) {
        if archived && !self.archived {
            self.collaborators_mut().clear();
        }
        self.archived = archived;
    }

    /// Set the pinned flag.
    pub fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
    }
}
