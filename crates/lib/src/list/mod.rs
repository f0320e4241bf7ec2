//! The list aggregate: a shared, ordered list of items.
//!
//! A [`List`] owns its [`Item`]s and its [`Collaborator`] entries by
//! composition; no other component holds an independent reference into
//! them, and the whole aggregate is persisted and mutated as one unit.
//! Collaboration-registry mutations live in [`collab`]; this module holds
//! the data model and simple queries.

mod collab;
pub mod errors;
mod id;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use errors::ListError;
pub use id::{ItemId, ListId, UserId};

/// The access level a collaborator holds on a list.
///
/// Owners are not collaborators and never appear in the registry; their
/// rights are implied by `owner_id` on the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Read-only access to the list and its items.
    #[default]
    View,
    /// May create, update, delete and reorder items.
    Edit,
}

impl FromStr for Permission {
    type Err = ListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(Permission::View),
            "edit" => Ok(Permission::Edit),
            other => Err(ListError::InvalidPermission {
                given: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Permission::View => write!(f, "view"),
            Permission::Edit => write!(f, "edit"),
        }
    }
}

/// A collaboration entry: one non-owner user granted access to a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collaborator {
    pub user_id: UserId,
    pub permission: Permission,
}

/// A single entry in a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub item_id: ItemId,
    pub text: String,
    pub completed: bool,
    pub sort_order: i64,
}

impl Item {
    /// Create a new, uncompleted item at the given position with a fresh id.
    pub fn new(text: impl Into<String>, sort_order: i64) -> Self {
        Self {
            item_id: ItemId::new(Uuid::new_v4().to_string()),
            text: text.into(),
            completed: false,
            sort_order,
        }
    }
}

/// A shared list: the aggregate unit of ownership, persistence and mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub list_id: ListId,
    pub name: String,
    /// The creating user. Exactly one, immutable for the life of the list.
    pub owner_id: UserId,
    /// Collaboration registry, unique by user id. Mutated only through the
    /// methods in [`collab`] so the registry invariants hold.
    collaborators: Vec<Collaborator>,
    pub items: Vec<Item>,
    pub archived: bool,
    pub pinned: bool,
    /// Position among the owner's (or a collaborator's) visible lists.
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl List {
    /// Create a fresh, empty list owned by `owner_id`.
    pub fn new(
        list_id: ListId,
        owner_id: UserId,
        name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            list_id,
            name: name.into(),
            owner_id,
            collaborators: Vec::new(),
            items: Vec::new(),
            archived: false,
            pinned: false,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// The current collaboration entries, in insertion order.
    pub fn collaborators(&self) -> &[Collaborator] {
        &self.collaborators
    }

    /// Whether `user` is the owner of this list.
    pub fn is_owner(&self, user: &UserId) -> bool {
        &self.owner_id == user
    }

    /// The permission `user` holds through the collaboration registry,
    /// or `None` for the owner and for strangers.
    pub fn permission_of(&self, user: &UserId) -> Option<Permission> {
        self.collaborators
            .iter()
            .find(|c| &c.user_id == user)
            .map(|c| c.permission)
    }

    /// Whether `user` may see this list in their visible-lists view.
    pub fn is_visible_to(&self, user: &UserId) -> bool {
        self.is_owner(user) || self.permission_of(user).is_some()
    }

    /// Look up an item by id.
    pub fn item(&self, item_id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| &i.item_id == item_id)
    }

    /// Look up an item by id, mutably.
    pub fn item_mut(&mut self, item_id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| &i.item_id == item_id)
    }

    /// Record a mutation instant for recency ordering.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    pub(crate) fn collaborators_mut(&mut self) -> &mut Vec<Collaborator> {
        &mut self.collaborators
    }
}
