//! Persistence for list aggregates.
//!
//! This module provides the [`ListStore`] trait and the [`InMemory`]
//! reference backend. A store persists each [`List`] together with its
//! embedded items and collaboration entries as one unit, and follows a
//! load-mutate-store-whole-document pattern: [`ListStore::update`] is
//! atomic *within* one request, but the store offers no document-level lock
//! or optimistic-concurrency token across requests: two concurrent
//! load-mutate-store sequences on the same aggregate race at write
//! granularity, and the last write wins. That trade-off is part of the
//! store contract, not an implementation accident.
//!
//! Minting of list ids is delegated to an [`IdMinter`], keeping the actual
//! id scheme external to the store logic.

pub mod errors;
mod in_memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;

pub use errors::StoreError;
pub use in_memory::InMemory;

use crate::Result;
use crate::constants::{LIST_ID_ALPHABET, LIST_ID_LEN};
use crate::list::{List, ListId, UserId};

/// A single whole-aggregate transformation, applied under [`ListStore::update`].
///
/// An error aborts the write and surfaces to the caller unchanged.
pub type Mutator = Box<dyn FnOnce(&mut List) -> Result<()> + Send>;

/// Source of opaque, unique, human-shareable list id strings.
///
/// Uniqueness is probabilistic: the store checks each minted id against
/// existing aggregates and retries silently on collision.
pub trait IdMinter: Send + Sync {
    /// Produce one candidate id.
    fn mint(&self) -> String;
}

/// The default minter: short random codes over a confusion-free alphabet.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortCodeMinter;

impl IdMinter for ShortCodeMinter {
    fn mint(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..LIST_ID_LEN)
            .map(|_| LIST_ID_ALPHABET[rng.gen_range(0..LIST_ID_ALPHABET.len())] as char)
            .collect()
    }
}

/// Store trait abstracting the persistence mechanism for list aggregates.
///
/// All implementations must be `Send + Sync` to be shared across request
/// tasks. Every method is an I/O suspension point from the caller's
/// perspective, even when a particular backend happens to answer from
/// memory.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Create and persist a fresh, empty list owned by `owner_id`.
    ///
    /// Mints the list id through the configured [`IdMinter`], retrying
    /// silently on collision.
    ///
    /// # Arguments
    /// * `owner_id` - The creating user; becomes the immutable owner.
    /// * `name` - Display name for the new list.
    /// * `now` - Creation instant for the recency timestamps.
    ///
    /// # Returns
    /// A `Result` containing the persisted `List`, or
    /// `StoreError::IdSpaceExhausted` if minting kept colliding.
    async fn create(&self, owner_id: UserId, name: String, now: DateTime<Utc>) -> Result<List>;

    /// Retrieve one aggregate by id.
    ///
    /// # Returns
    /// A `Result` containing an owned copy of the `List` if found, or
    /// `StoreError::ListNotFound` otherwise.
    async fn get(&self, list_id: &ListId) -> Result<List>;

    /// Load the current aggregate, apply `mutator`, and persist the whole
    /// document in a single atomic write.
    ///
    /// The load and the store are two separate suspension points: nothing
    /// prevents another request from writing in between, in which case the
    /// later write wins.
    ///
    /// # Returns
    /// A `Result` containing the updated `List`, `StoreError::ListNotFound`
    /// if no aggregate exists, or the mutator's own error (in which case
    /// nothing is written).
    async fn update(&self, list_id: &ListId, mutator: Mutator) -> Result<List>;

    /// Remove the aggregate permanently.
    ///
    /// # Returns
    /// A `Result` that is `Ok` on removal, or `StoreError::ListNotFound` on
    /// repeated deletion (idempotent from the second call's perspective).
    async fn delete(&self, list_id: &ListId) -> Result<()>;

    /// All lists where `user_id` is the owner or holds a collaboration entry.
    ///
    /// Ordering is left to the caller.
    async fn visible_to(&self, user_id: &UserId) -> Result<Vec<List>>;
}
