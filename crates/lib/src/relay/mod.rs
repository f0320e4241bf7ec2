//! Room-scoped realtime event relay.
//!
//! The relay fans completed-mutation events out to every connection joined
//! to a list's room. It is wired independently of the authoritative
//! mutation path: clients re-broadcast an event over their own connection
//! after a successful REST call, and the relay passes it along without
//! consulting the store or performing any authorization. Delivery is
//! best-effort and at-most-once: no retry, no persisted log, no
//! backpressure; a disconnected or slow subscriber simply misses events.
//! There is no sender exclusion, so self-delivery is possible.
//!
//! Room membership is an explicit mapping from list id to the set of live
//! connection handles, owned solely by the [`Relay`] value. A connection's
//! membership lifecycle is tied to its socket: the transport layer calls
//! [`Relay::disconnect`] when the socket closes.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::list::ListId;

/// Identifier of one live connection, minted at socket accept time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Mint a fresh connection id.
    pub fn mint() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The relay's event catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    CollaboratorAdded,
    CollaboratorRemoved,
    PermissionChanged,
    ListUpdated,
    ListDeleted,
}

/// One relay event as it travels the wire.
///
/// The payload is an opaque passthrough: raw JSON text the relay never
/// parses or interprets. Only `list_updated` conventionally carries one,
/// but the relay does not enforce that either.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub event: EventKind,
    pub list_id: ListId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Box<RawValue>>,
}

impl Envelope {
    /// An envelope with no payload.
    pub fn bare(event: EventKind, list_id: ListId) -> Self {
        Self {
            event,
            list_id,
            payload: None,
        }
    }
}

/// Handle the relay delivers serialized frames through.
///
/// One handle per connection; the transport side drains the paired receiver
/// into the socket.
pub type Outbox = mpsc::Sender<String>;

/// Room-scoped pub-sub over live connections. No persistence.
///
/// Safe under concurrent join/leave/publish from many connection tasks;
/// there is no ordering requirement across distinct rooms.
#[derive(Default)]
pub struct Relay {
    /// room id → (connection id → outbox)
    rooms: RwLock<HashMap<ListId, HashMap<ConnectionId, Outbox>>>,
}

impl Relay {
    /// Create a relay with no rooms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Join `conn` to the room of `list_id`, registering its outbox.
    ///
    /// Joining twice replaces the previous outbox. Any connection that
    /// knows a list id may join; the channel performs no authorization of
    /// its own.
    pub fn join(&self, list_id: ListId, conn: ConnectionId, outbox: Outbox) {
        let mut rooms = self.rooms.write().unwrap();
        rooms.entry(list_id).or_default().insert(conn, outbox);
    }

    /// Remove `conn` from the room of `list_id`.
    ///
    /// Leaving a room the connection never joined is a no-op.
    pub fn leave(&self, list_id: &ListId, conn: &ConnectionId) {
        let mut rooms = self.rooms.write().unwrap();
        if let Some(room) = rooms.get_mut(list_id) {
            room.remove(conn);
            if room.is_empty() {
                rooms.remove(list_id);
            }
        }
    }

    /// Remove `conn` from every room it joined.
    ///
    /// Called by the transport when the underlying socket closes.
    pub fn disconnect(&self, conn: &ConnectionId) {
        let mut rooms = self.rooms.write().unwrap();
        rooms.retain(|_, room| {
            room.remove(conn);
            !room.is_empty()
        });
    }

    /// Deliver `envelope` to every connection currently joined to its room.
    ///
    /// Serialization happens once; each subscriber gets its own copy via a
    /// non-blocking send. Full or closed outboxes are skipped silently.
    ///
    /// # Returns
    /// The number of connections the frame was handed to.
    pub fn publish(&self, envelope: &Envelope) -> usize {
        let frame = match serde_json::to_string(envelope) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to encode relay frame: {e}");
                return 0;
            }
        };

        let rooms = self.rooms.read().unwrap();
        let Some(room) = rooms.get(&envelope.list_id) else {
            return 0;
        };

        let mut delivered = 0;
        for (conn, outbox) in room {
            match outbox.try_send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    // At-most-once: the subscriber misses this event.
                    tracing::debug!("Dropping relay frame for {conn}: {e}");
                }
            }
        }
        delivered
    }

    /// Number of connections currently joined to a room.
    pub fn room_size(&self, list_id: &ListId) -> usize {
        let rooms = self.rooms.read().unwrap();
        rooms.get(list_id).map_or(0, HashMap::len)
    }
}
