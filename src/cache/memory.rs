//! Process-lifetime key/value store for decoded responses

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::data::{PokemonDetails, PokemonPage};

/// A decoded, normalized response held by the cache
///
/// Values are shared behind `Arc`, so every cache hit hands out the very
/// same record that was stored.
#[derive(Debug, Clone)]
pub enum CachedResponse {
    Page(Arc<PokemonPage>),
    Details(Arc<PokemonDetails>),
}

/// Read-only snapshot of the cache contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of entries
    pub size: usize,
    /// Entry keys, sorted
    pub keys: Vec<String>,
}

/// In-memory cache keyed by request parameters
///
/// Keys are derived by the client (`list_<offset>_<limit>`,
/// `details_<idOrName>`). There is no TTL and no eviction. Two concurrent
/// fetches for the same key may both insert; the last write wins.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CachedResponse>>,
}

impl ResponseCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries are immutable once written, so a poisoned lock still guards
    /// a consistent map.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CachedResponse>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &str) -> Option<CachedResponse> {
        self.lock().get(key).cloned()
    }

    /// Looks up a list page; `None` on a miss or if the key holds another kind
    pub fn get_page(&self, key: &str) -> Option<Arc<PokemonPage>> {
        match self.get(key)? {
            CachedResponse::Page(page) => Some(page),
            CachedResponse::Details(_) => None,
        }
    }

    /// Looks up a detail record; `None` on a miss or if the key holds another kind
    pub fn get_details(&self, key: &str) -> Option<Arc<PokemonDetails>> {
        match self.get(key)? {
            CachedResponse::Details(details) => Some(details),
            CachedResponse::Page(_) => None,
        }
    }

    pub fn insert(&self, key: impl Into<String>, value: CachedResponse) {
        self.lock().insert(key.into(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// Removes every entry
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of the current size and keys
    ///
    /// The key list is a copy; mutating it has no effect on the cache.
    pub fn stats(&self) -> CacheStats {
        let entries = self.lock();
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        CacheStats {
            size: entries.len(),
            keys,
        }
    }
}
