//! In-process TTL cache for provider responses.
//!
//! A mutex-protected map from logical request key to a JSON payload with an
//! absolute expiry. Entries are purged lazily: an expired entry is removed
//! by the next lookup of its key, never by a background sweep. The cache is
//! process-local and starts empty on every boot.
//!
//! There is no capacity bound beyond TTL expiry. That holds up because the
//! cacheable key space is bounded by request diversity (trending, genre
//! list, per-movie records); unbounded key spaces (free-text search,
//! discover filters) are never cached.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde_json::Value;

#[derive(Debug)]
struct Entry {
    value: Value,
    expires_at: Instant,
}

/// TTL cache keyed by logical request identity (`movie:603`,
/// `trending:week`, ...).
///
/// Owned by whoever composes the catalog; construct one instance per
/// process (or per test) rather than sharing a global.
#[derive(Debug, Default)]
pub struct TtlCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl TtlCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock means a panicking thread held it; the map itself is
    // still structurally sound, so keep going with the inner value.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Look up a key.
    ///
    /// Returns `None` both when the key was never set and when the stored
    /// entry has expired; in the latter case the entry is removed as a side
    /// effect of this lookup.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a value under a key, unconditionally replacing any existing
    /// entry. Returns the stored value so the call composes as the tail of
    /// a fetch-or-populate sequence.
    ///
    /// Two concurrent writers for the same key are not serialized beyond
    /// the map lock: the last write wins.
    pub fn set(&self, key: &str, value: Value, ttl: Duration) -> Value {
        let mut entries = self.lock();
        entries.insert(key.to_string(), Entry { value: value.clone(), expires_at: Instant::now() + ttl });
        value
    }

    /// Number of stored entries, counting expired ones no lookup has
    /// purged yet.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
