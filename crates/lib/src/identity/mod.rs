//! Identity provider seam.
//!
//! Credential issuance, verification and password handling are external to
//! Tandem. The server only ever asks two questions of the provider: "which
//! user does this presented credential belong to?" and "which user does
//! this handle (username, email, ...) refer to?". Both are modeled on the
//! [`Directory`] trait; [`InMemoryDirectory`] is the reference
//! implementation used by the server binary and the tests.

pub mod errors;

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::Deserialize;

pub use errors::DirectoryError;

use crate::Result;
use crate::list::UserId;

/// External identity lookups.
///
/// `Ok(None)` is the *negative answer* (unknown credential / unknown
/// handle); an `Err` means the provider itself failed and surfaces as an
/// unclassified infrastructure error.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Map a presented bearer credential to a user id.
    async fn verify_token(&self, token: &str) -> Result<Option<UserId>>;

    /// Map an external lookup key (username, email, ...) to a user id.
    async fn resolve_handle(&self, handle: &str) -> Result<Option<UserId>>;
}

/// One identity record in a directory seed file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectoryRecord {
    user_id: UserId,
    token: String,
    #[serde(default)]
    handles: Vec<String>,
}

/// In-memory reference directory.
///
/// Holds plain token and handle tables. Suitable for development and tests;
/// a production deployment would put a real identity provider behind the
/// [`Directory`] trait instead.
#[derive(Default)]
pub struct InMemoryDirectory {
    tokens: RwLock<HashMap<String, UserId>>,
    handles: RwLock<HashMap<String, UserId>>,
}

impl InMemoryDirectory {
    /// Creates a new, empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with a bearer token and any number of lookup handles.
    pub fn add_user(
        &self,
        user_id: impl Into<UserId>,
        token: impl Into<String>,
        handles: &[&str],
    ) {
        let user_id = user_id.into();
        self.tokens
            .write()
            .unwrap()
            .insert(token.into(), user_id.clone());
        let mut table = self.handles.write().unwrap();
        for handle in handles {
            table.insert((*handle).to_string(), user_id.clone());
        }
    }

    /// Load a directory from a JSON seed file of
    /// `[{"userId": ..., "token": ..., "handles": [...]}]` records.
    ///
    /// If the file does not exist, an empty directory is returned.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let directory = Self::new();
        if !path.exists() {
            return Ok(directory);
        }
        let json = std::fs::read_to_string(path).map_err(|e| DirectoryError::Unavailable {
            reason: format!("reading {}: {e}", path.display()),
        })?;
        let records: Vec<DirectoryRecord> =
            serde_json::from_str(&json).map_err(|e| DirectoryError::Unavailable {
                reason: format!("parsing {}: {e}", path.display()),
            })?;
        for record in records {
            let handles: Vec<&str> = record.handles.iter().map(String::as_str).collect();
            directory.add_user(record.user_id, record.token, &handles);
        }
        Ok(directory)
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn verify_token(&self, token: &str) -> Result<Option<UserId>> {
        Ok(self.tokens.read().unwrap().get(token).cloned())
    }

    async fn resolve_handle(&self, handle: &str) -> Result<Option<UserId>> {
        Ok(self.handles.read().unwrap().get(handle).cloned())
    }
}
