//! Shared constants for the Tandem library.

/// Alphabet used by the default list-id minter.
///
/// Lowercase alphanumerics with ambiguous characters (`l`, `o`, `0`, `1`)
/// removed, since list ids are meant to be read aloud and retyped.
pub const LIST_ID_ALPHABET: &[u8] = b"23456789abcdefghijkmnpqrstuvwxyz";

/// Length of generated list ids.
pub const LIST_ID_LEN: usize = 10;

/// Upper bound on mint-and-retry attempts when creating a list.
///
/// Collisions are retried silently; exhausting this bound surfaces as an
/// infrastructure failure rather than a client error.
pub const MAX_MINT_ATTEMPTS: usize = 16;

/// Per-connection relay queue depth.
///
/// A subscriber whose queue is full simply misses events; the relay never
/// blocks a publisher on a slow consumer.
pub const RELAY_QUEUE_DEPTH: usize = 64;
