//! In-memory store backend.
//!
//! Suitable for testing, development, or small deployments where
//! persistence is handled by saving/loading the entire state to/from a
//! JSON file. The internal lock is held only for the duration of a single
//! read or write, never across a whole load-mutate-store cycle, so this
//! backend exhibits the same last-write-wins behavior under concurrent
//! updates as a remote document store would.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{IdMinter, ListStore, Mutator, ShortCodeMinter, StoreError};
use crate::Result;
use crate::constants::MAX_MINT_ATTEMPTS;
use crate::list::{List, ListId, UserId};

/// A simple in-memory store keyed by list id.
///
/// Provides basic persistence via [`InMemory::save_to_file`] and
/// [`InMemory::load_from_file`], serializing all aggregates to JSON.
pub struct InMemory {
    /// Aggregates with a read-write lock for concurrent access
    lists: RwLock<HashMap<ListId, List>>,
    minter: Box<dyn IdMinter>,
}

impl InMemory {
    /// Creates a new, empty `InMemory` store with the default id minter.
    pub fn new() -> Self {
        Self::with_minter(Box::new(ShortCodeMinter))
    }

    /// Creates an empty store with a custom id minter.
    pub fn with_minter(minter: Box<dyn IdMinter>) -> Self {
        Self {
            lists: RwLock::new(HashMap::new()),
            minter,
        }
    }

    /// Number of aggregates currently stored.
    pub fn len(&self) -> usize {
        self.lists.read().unwrap().len()
    }

    /// Whether the store holds no aggregates.
    pub fn is_empty(&self) -> bool {
        self.lists.read().unwrap().is_empty()
    }

    /// Saves the entire store state to a file as JSON.
    ///
    /// # Arguments
    /// * `path` - The path to the file where the state should be saved.
    ///
    /// # Returns
    /// A `Result` indicating success or an I/O or serialization error.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let lists = self.lists.read().unwrap();
        let mut all: Vec<&List> = lists.values().collect();
        all.sort_by(|a, b| a.list_id.cmp(&b.list_id));
        let json =
            serde_json::to_string_pretty(&all).map_err(|e| StoreError::SerializationFailed {
                reason: e.to_string(),
            })?;
        std::fs::write(path, json).map_err(StoreError::Io)?;
        Ok(())
    }

    /// Loads store state from a JSON file.
    ///
    /// If the file does not exist, a new, empty store is returned.
    ///
    /// # Arguments
    /// * `path` - The path to the file from which to load the state.
    ///
    /// # Returns
    /// A `Result` containing the loaded store or an I/O or deserialization
    /// error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let json = std::fs::read_to_string(path).map_err(StoreError::Io)?;
        let all: Vec<List> =
            serde_json::from_str(&json).map_err(|e| StoreError::SerializationFailed {
                reason: e.to_string(),
            })?;
        let store = Self::new();
        {
            let mut lists = store.lists.write().unwrap();
            for list in all {
                lists.insert(list.list_id.clone(), list);
            }
        }
        Ok(store)
    }
}

impl Default for InMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListStore for InMemory {
    async fn create(&self, owner_id: UserId, name: String, now: DateTime<Utc>) -> Result<List> {
        for _ in 0..MAX_MINT_ATTEMPTS {
            let candidate = ListId::new(self.minter.mint());
            let mut lists = self.lists.write().unwrap();
            if lists.contains_key(&candidate) {
                // Collision: drop the lock and mint again.
                continue;
            }
            let list = List::new(candidate.clone(), owner_id.clone(), name.clone(), now);
            lists.insert(candidate, list.clone());
            return Ok(list);
        }
        Err(StoreError::IdSpaceExhausted {
            attempts: MAX_MINT_ATTEMPTS,
        }
        .into())
    }

    async fn get(&self, list_id: &ListId) -> Result<List> {
        let lists = self.lists.read().unwrap();
        lists
            .get(list_id)
            .cloned()
            .ok_or_else(|| StoreError::ListNotFound { id: list_id.clone() }.into())
    }

    async fn update(&self, list_id: &ListId, mutator: Mutator) -> Result<List> {
        // Load an owned copy, releasing the lock before the mutation runs.
        let mut list = {
            let lists = self.lists.read().unwrap();
            lists
                .get(list_id)
                .cloned()
                .ok_or_else(|| StoreError::ListNotFound { id: list_id.clone() })?
        };

        mutator(&mut list)?;

        // Single whole-document write. A concurrent update that committed in
        // the meantime is overwritten: last write wins.
        let mut lists = self.lists.write().unwrap();
        lists.insert(list_id.clone(), list.clone());
        Ok(list)
    }

    async fn delete(&self, list_id: &ListId) -> Result<()> {
        let mut lists = self.lists.write().unwrap();
        match lists.remove(list_id) {
            Some(_) => Ok(()),
            None => Err(StoreError::ListNotFound { id: list_id.clone() }.into()),
        }
    }

    async fn visible_to(&self, user_id: &UserId) -> Result<Vec<List>> {
        let lists = self.lists.read().unwrap();
        Ok(lists
            .values()
            .filter(|l| l.is_visible_to(user_id))
            .cloned()
            .collect())
    }
}
