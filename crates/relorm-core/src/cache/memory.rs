use crate::cache::{KvCache, MaxAge};
use dashmap::DashMap;
use std::time::Instant;

///
/// Entry
///

#[derive(Clone, Debug)]
struct Entry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

///
/// MemoryCache
///
/// In-process `KvCache` over a sharded concurrent map. Expired entries are
/// evicted lazily on fetch.
///

#[derive(Debug)]
pub struct MemoryCache<V> {
    entries: DashMap<String, Entry<V>>,
}

impl<V> MemoryCache<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> KvCache<V> for MemoryCache<V>
where
    V: Clone + Send + Sync,
{
    fn put(&self, key: &str, value: V, max_age: MaxAge) {
        let expires_at = match max_age {
            MaxAge::Forever => None,
            MaxAge::For(ttl) => Instant::now().checked_add(ttl),
        };
        self.entries
            .insert(key.to_string(), Entry { value, expires_at });
    }

    fn fetch(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let hit = self.entries.get(key).map(|entry| {
            if entry.is_expired(now) {
                None
            } else {
                Some(entry.value.clone())
            }
        })?;

        if hit.is_none() {
            self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        }

        hit
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    fn clear_all(&self) {
        self.entries.clear();
    }
}
