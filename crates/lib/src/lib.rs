//!
//! Tandem: shared lists, together.
//! This library provides the core components for running a Tandem server:
//! collaborative, ordered lists of items shared between users.
//!
//! ## Core Concepts
//!
//! Tandem is built around several key concepts:
//!
//! * **Lists (`list::List`)**: The aggregate unit of sharing. A list owns its items and
//!   its collaboration entries and is always persisted and mutated as a whole.
//! * **Capabilities (`access`)**: A pure decision function answering whether an actor may
//!   perform one class of operation (read, edit items, manage collaborators, ...) on a list.
//! * **Stores (`store::ListStore`)**: A pluggable persistence layer for list aggregates,
//!   following a load-mutate-store-whole-document pattern.
//! * **Ordering (`order`)**: Integer-position reconciliation for lists and items, tolerant
//!   of partial reorders.
//! * **Relay (`relay::Relay`)**: Room-scoped, best-effort event fan-out to connected
//!   clients, wired independently of the mutation path.
//! * **Service (`service::ListService`)**: The authoritative mutation path combining
//!   store, access control, and ordering per operation.

pub mod access;
pub mod api;
pub mod clock;
pub mod constants;
pub mod identity;
pub mod list;
pub mod order;
pub mod relay;
pub mod service;
pub mod store;

/// Re-export the `List` aggregate for easier access.
pub use list::List;
/// Re-export the clock seam, used throughout for recency timestamps.
pub use clock::{Clock, SystemClock};

/// Result type used throughout the Tandem library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Tandem library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured access-control errors from the access module
    #[error(transparent)]
    Access(access::AccessError),

    /// Structured aggregate errors from the list module
    #[error(transparent)]
    List(list::ListError),

    /// Structured persistence errors from the store module
    #[error(transparent)]
    Store(store::StoreError),

    /// Structured reorder errors from the order module
    #[error(transparent)]
    Order(order::OrderError),

    /// Structured identity-lookup errors from the identity module
    #[error(transparent)]
    Identity(identity::DirectoryError),

    /// Structured service errors from the service module
    #[error(transparent)]
    Service(service::ServiceError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Access(_) => "access",
            Error::List(_) => "list",
            Error::Store(_) => "store",
            Error::Order(_) => "order",
            Error::Identity(_) => "identity",
            Error::Service(_) => "service",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::List(list_err) => list_err.is_not_found(),
            Error::Store(store_err) => store_err.is_not_found(),
            Error::Service(service_err) => service_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates the caller presented no (or an invalid) credential.
    pub fn is_authentication_error(&self) -> bool {
        match self {
            Error::Access(access_err) => access_err.is_authentication_error(),
            _ => false,
        }
    }

    /// Check if this error indicates an authenticated caller lacked capability.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Error::Access(access_err) => access_err.is_permission_denied(),
            _ => false,
        }
    }

    /// Check if this error indicates a conflict with existing state.
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::List(list_err) => list_err.is_conflict(),
            _ => false,
        }
    }

    /// Check if this error is validation-related.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::List(list_err) => list_err.is_validation_error(),
            Error::Order(_) => true,
            Error::Service(service_err) => service_err.is_validation_error(),
            _ => false,
        }
    }

    /// Check if this error is an infrastructure failure with no client-facing classification.
    pub fn is_unclassified(&self) -> bool {
        !(self.is_not_found()
            || self.is_authentication_error()
            || self.is_permission_denied()
            || self.is_conflict()
            || self.is_validation_error())
    }
}
