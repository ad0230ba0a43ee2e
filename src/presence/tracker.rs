//! Presence tracker implementation
//!
//! A connection belongs to at most one stream's membership at a time;
//! the tracker owns that binding. The registry performs the implicit
//! leave-then-join dance when a connection switches streams so it can
//! rebroadcast viewer counts on both sides.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Identifier for one subscriber connection
///
/// Allocated by the transport layer (typically from an atomic counter,
/// one per accepted connection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnId(u64);

impl ConnId {
    /// Create a connection id from a raw value
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw value
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ConnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[derive(Debug, Default)]
struct PresenceInner {
    /// Stream name -> member connections
    by_stream: HashMap<String, HashSet<ConnId>>,
    /// Connection -> the one stream it is watching
    by_conn: HashMap<ConnId, String>,
}

/// Per-stream viewer-set membership
///
/// Sync leaf: the mutex guards short, non-awaiting sections only.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    inner: Mutex<PresenceInner>,
}

impl PresenceTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `conn` to `name`'s viewer set
    ///
    /// Returns the new viewer count, or `None` if the stream is at
    /// `max_viewers`. Joining a stream the connection is already a
    /// member of is a no-op that reports the current count.
    ///
    /// The caller must have released any previous binding via
    /// [`PresenceTracker::leave`] first.
    pub fn join(&self, name: &str, conn: ConnId, max_viewers: usize) -> Option<usize> {
        let mut inner = self.inner.lock().expect("presence mutex poisoned");
        let PresenceInner { by_stream, by_conn } = &mut *inner;

        let members = by_stream.entry(name.to_string()).or_default();
        if members.contains(&conn) {
            return Some(members.len());
        }
        if members.len() >= max_viewers {
            // Drop the empty set we may have just created
            if members.is_empty() {
                by_stream.remove(name);
            }
            return None;
        }

        members.insert(conn);
        let count = members.len();
        by_conn.insert(conn, name.to_string());
        Some(count)
    }

    /// Remove `conn` from whatever stream it is watching
    ///
    /// Idempotent: returns `None` if the connection was not a member
    /// anywhere, otherwise the stream it left and that stream's new
    /// viewer count.
    pub fn leave(&self, conn: ConnId) -> Option<(String, usize)> {
        let mut inner = self.inner.lock().expect("presence mutex poisoned");
        let PresenceInner { by_stream, by_conn } = &mut *inner;

        let name = by_conn.remove(&conn)?;
        let count = match by_stream.get_mut(&name) {
            Some(members) => {
                members.remove(&conn);
                members.len()
            }
            None => 0,
        };
        if count == 0 {
            by_stream.remove(&name);
        }

        Some((name, count))
    }

    /// The stream `conn` is currently watching, if any
    pub fn current(&self, conn: ConnId) -> Option<String> {
        let inner = self.inner.lock().expect("presence mutex poisoned");
        inner.by_conn.get(&conn).cloned()
    }

    /// Current viewer count for a stream
    pub fn count(&self, name: &str) -> usize {
        let inner = self.inner.lock().expect("presence mutex poisoned");
        inner.by_stream.get(name).map_or(0, HashSet::len)
    }

    /// Total connections currently watching any stream
    pub fn total(&self) -> usize {
        let inner = self.inner.lock().expect("presence mutex poisoned");
        inner.by_conn.len()
    }
}
