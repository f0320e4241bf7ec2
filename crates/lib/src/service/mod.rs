//! The authoritative mutation path.
//!
//! [`ListService`] composes the store, the access-control evaluator, the
//! ordering engine and the external identity directory into one operation
//! per REST route. Every operation follows the same shape: load the
//! aggregate (existence before authorization, a missing list is NotFound
//! no matter who asks), evaluate the required capability, then apply the
//! mutation through a single whole-document [`ListStore::update`] write.
//!
//! The service never touches the realtime relay: event fan-out is driven by
//! clients re-broadcasting after a successful call, on a path of its own.

pub mod errors;

use std::sync::Arc;

use chrono::{DateTime, Utc};

pub use errors::ServiceError;

use crate::Result;
use crate::access::{self, Actor, Capability};
use crate::clock::Clock;
use crate::identity::Directory;
use crate::list::{Item, ItemId, List, ListError, ListId, Permission, UserId};
use crate::order;
use crate::store::ListStore;

/// Partial update of one item; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

/// Collaborative list operations, one method per externally visible route.
pub struct ListService {
    store: Arc<dyn ListStore>,
    directory: Arc<dyn Directory>,
    clock: Arc<dyn Clock>,
}

impl ListService {
    /// Assemble a service over a store, an identity directory and a clock.
    pub fn new(
        store: Arc<dyn ListStore>,
        directory: Arc<dyn Directory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            directory,
            clock,
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Load the aggregate and evaluate `capability` against it.
    ///
    /// The returned copy is a snapshot for the authorization decision; the
    /// mutation itself re-loads inside [`ListStore::update`].
    async fn authorize(
        &self,
        actor: &Actor,
        list_id: &ListId,
        capability: Capability,
    ) -> Result<List> {
        let list = self.store.get(list_id).await?;
        access::evaluate(actor, &list, capability)?;
        Ok(list)
    }

    // === Lists ===

    /// Create a new, empty list. The caller becomes its owner.
    pub async fn create_list(&self, actor: &Actor, name: impl Into<String>) -> Result<List> {
        let owner = actor.require_user()?.clone();
        let list = self.store.create(owner, name.into(), self.now()).await?;
        tracing::info!("Created list {} for {}", list.list_id, list.owner_id);
        Ok(list)
    }

    /// Fetch one list with its full contents. Requires no authorization.
    pub async fn fetch_list(&self, list_id: &ListId) -> Result<List> {
        self.store.get(list_id).await
    }

    /// All lists visible to the actor, ordered by position then recency.
    pub async fn visible_lists(&self, actor: &Actor) -> Result<Vec<List>> {
        let user = actor.require_user()?;
        let mut lists = self.store.visible_to(user).await?;
        lists.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then(b.updated_at.cmp(&a.updated_at))
        });
        Ok(lists)
    }

    /// Rename a list. Owner only.
    pub async fn rename_list(
        &self,
        actor: &Actor,
        list_id: &ListId,
        name: impl Into<String>,
    ) -> Result<List> {
        self.authorize(actor, list_id, Capability::EditMetadata)
            .await?;
        let name = name.into();
        let now = self.now();
        self.store
            .update(
                list_id,
                Box::new(move |list| {
                    list.name = name;
                    list.touch(now);
                    Ok(())
                }),
            )
            .await
    }

    /// Destroy a list permanently. Owner only; irreversible.
    pub async fn delete_list(&self, actor: &Actor, list_id: &ListId) -> Result<()> {
        self.authorize(actor, list_id, Capability::Delete).await?;
        self.store.delete(list_id).await?;
        tracing::info!("Deleted list {list_id}");
        Ok(())
    }

    /// Set or toggle the archived flag. Owner only.
    ///
    /// `desired` is the explicit optional-boolean contract of the route
    /// body: `Some(v)` sets the flag to `v`, `None` flips the current
    /// value. Archiving evicts all collaborators; unarchiving does not
    /// restore them.
    pub async fn set_archived(
        &self,
        actor: &Actor,
        list_id: &ListId,
        desired: Option<bool>,
    ) -> Result<List> {
        self.authorize(actor, list_id, Capability::Archive).await?;
        let now = self.now();
        self.store
            .update(
                list_id,
                Box::new(move |list| {
                    list.set_archived(desired.unwrap_or(!list.archived));
                    list.touch(now);
                    Ok(())
                }),
            )
            .await
    }

    /// Set or toggle the pinned flag. Owner only. Same optional-boolean
    /// contract as [`ListService::set_archived`].
    pub async fn set_pinned(
        &self,
        actor: &Actor,
        list_id: &ListId,
        desired: Option<bool>,
    ) -> Result<List> {
        self.authorize(actor, list_id, Capability::Pin).await?;
        let now = self.now();
        self.store
            .update(
                list_id,
                Box::new(move |list| {
                    list.set_pinned(desired.unwrap_or(!list.pinned));
                    list.touch(now);
                    Ok(())
                }),
            )
            .await
    }

    /// Reorder the actor's visible lists.
    ///
    /// `desired` may name any subset of the visible lists; named lists take
    /// their position in the sequence, unnamed lists keep their prior
    /// position. Each named list is persisted through its own aggregate
    /// write. Position moves do not count as content edits, so recency
    /// stamps are left alone.
    pub async fn reorder_lists(&self, actor: &Actor, desired: &[String]) -> Result<Vec<List>> {
        let user = actor.require_user()?;
        let mut visible = self.store.visible_to(user).await?;
        order::apply_reorder(&mut visible, desired)?;

        for (position, id) in desired.iter().enumerate() {
            let position = position as i64;
            self.store
                .update(
                    &ListId::from(id.as_str()),
                    Box::new(move |list| {
                        list.sort_order = position;
                        Ok(())
                    }),
                )
                .await?;
        }
        Ok(visible)
    }

    // === Collaborators ===

    /// Add a collaborator, resolved from an external lookup handle. Owner
    /// only; defaults to view permission.
    pub async fn add_collaborator(
        &self,
        actor: &Actor,
        list_id: &ListId,
        handle: &str,
        permission: Option<Permission>,
    ) -> Result<List> {
        self.authorize(actor, list_id, Capability::ManageCollaborators)
            .await?;
        let user_id = self
            .directory
            .resolve_handle(handle)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound {
                handle: handle.to_string(),
            })?;

        let now = self.now();
        self.store
            .update(
                list_id,
                Box::new(move |list| {
                    list.add_collaborator(user_id, permission.unwrap_or_default())?;
                    list.touch(now);
                    Ok(())
                }),
            )
            .await
    }

    /// Remove a collaborator. Owner only.
    pub async fn remove_collaborator(
        &self,
        actor: &Actor,
        list_id: &ListId,
        user_id: &UserId,
    ) -> Result<List> {
        self.authorize(actor, list_id, Capability::ManageCollaborators)
            .await?;
        let user_id = user_id.clone();
        let now = self.now();
        self.store
            .update(
                list_id,
                Box::new(move |list| {
                    list.remove_collaborator(&user_id)?;
                    list.touch(now);
                    Ok(())
                }),
            )
            .await
    }

    /// Change a collaborator's permission. Owner only.
    pub async fn set_collaborator_permission(
        &self,
        actor: &Actor,
        list_id: &ListId,
        user_id: &UserId,
        permission: Permission,
    ) -> Result<List> {
        self.authorize(actor, list_id, Capability::ManageCollaborators)
            .await?;
        let user_id = user_id.clone();
        let now = self.now();
        self.store
            .update(
                list_id,
                Box::new(move |list| {
                    list.set_permission(&user_id, permission)?;
                    list.touch(now);
                    Ok(())
                }),
            )
            .await
    }

    // === Items ===

    /// Append a new item. Owner or edit-collaborator.
    ///
    /// The item starts uncompleted, positioned after the current entries.
    pub async fn add_item(
        &self,
        actor: &Actor,
        list_id: &ListId,
        text: impl Into<String>,
    ) -> Result<Item> {
        self.authorize(actor, list_id, Capability::EditItems).await?;
        let text = text.into();
        let now = self.now();
        let item_id = ItemId::new(uuid::Uuid::new_v4().to_string());
        let updated = self
            .store
            .update(
                list_id,
                Box::new({
                    let item_id = item_id.clone();
                    move |list| {
                        list.items.push(Item {
                            item_id,
                            text,
                            completed: false,
                            sort_order: list.items.len() as i64,
                        });
                        list.touch(now);
                        Ok(())
                    }
                }),
            )
            .await?;
        let item = updated.item(&item_id).cloned();
        Ok(item.expect("inserted by the mutator above"))
    }

    /// Patch an item's text and/or completion flag. Owner or
    /// edit-collaborator.
    pub async fn update_item(
        &self,
        actor: &Actor,
        list_id: &ListId,
        item_id: &ItemId,
        patch: ItemPatch,
    ) -> Result<Item> {
        self.authorize(actor, list_id, Capability::EditItems).await?;
        let item_id = item_id.clone();
        let now = self.now();
        let updated = self
            .store
            .update(
                list_id,
                Box::new({
                    let item_id = item_id.clone();
                    move |list| {
                        let item = list
                            .item_mut(&item_id)
                            .ok_or(ListError::ItemNotFound { item: item_id })?;
                        if let Some(text) = patch.text {
                            item.text = text;
                        }
                        if let Some(completed) = patch.completed {
                            item.completed = completed;
                        }
                        list.touch(now);
                        Ok(())
                    }
                }),
            )
            .await?;
        let item = updated.item(&item_id).cloned();
        Ok(item.expect("item survived the patch"))
    }

    /// Delete an item. Owner or edit-collaborator.
    pub async fn delete_item(
        &self,
        actor: &Actor,
        list_id: &ListId,
        item_id: &ItemId,
    ) -> Result<List> {
        self.authorize(actor, list_id, Capability::EditItems).await?;
        let item_id = item_id.clone();
        let now = self.now();
        self.store
            .update(
                list_id,
                Box::new(move |list| {
                    let before = list.items.len();
                    list.items.retain(|i| i.item_id != item_id);
                    if list.items.len() == before {
                        return Err(ListError::ItemNotFound { item: item_id }.into());
                    }
                    list.touch(now);
                    Ok(())
                }),
            )
            .await
    }

    /// Reorder a list's items. Owner or edit-collaborator.
    pub async fn reorder_items(
        &self,
        actor: &Actor,
        list_id: &ListId,
        desired: Vec<String>,
    ) -> Result<List> {
        self.authorize(actor, list_id, Capability::EditItems).await?;
        let now = self.now();
        self.store
            .update(
                list_id,
                Box::new(move |list| {
                    order::apply_reorder(&mut list.items, &desired)?;
                    list.touch(now);
                    Ok(())
                }),
            )
            .await
    }
}
