//! # Memory Tier
//!
//! Bounded in-process map from [`CacheKey`] to payload, limited by both an
//! entry count and a total byte cost. When an insert would exceed either
//! limit, the oldest insertions are dropped until both hold again.
//!
//! This tier is a best-effort fast path. Callers must not rely on any
//! particular eviction order or on an entry surviving between calls.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::key::CacheKey;
use crate::MediaBytes;

/// Bounded in-memory tier. Clones share the same storage.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<State>>,
    max_entries: usize,
    max_bytes: u64,
}

#[derive(Debug, Default)]
struct State {
    map: HashMap<CacheKey, MediaBytes>,
    order: VecDeque<CacheKey>,
    bytes: u64,
}

impl MemoryStore {
    /// Create a tier holding at most `max_entries` entries and `max_bytes` payload bytes.
    pub fn new(max_entries: usize, max_bytes: u64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(State::default())),
            max_entries,
            max_bytes,
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<MediaBytes> {
        self.inner.read().map.get(key).cloned()
    }

    /// Insert or replace `key`. Returns `false` if the payload alone exceeds
    /// the byte ceiling and was not stored.
    pub fn insert(&self, key: CacheKey, value: MediaBytes) -> bool {
        let cost = value.len() as u64;
        if cost > self.max_bytes || self.max_entries == 0 {
            return false;
        }

        let mut st = self.inner.write();
        if let Some(old) = st.map.remove(&key) {
            st.bytes -= old.len() as u64;
            st.order.retain(|k| k != &key);
        }
        st.map.insert(key.clone(), value);
        st.order.push_back(key);
        st.bytes += cost;

        while st.map.len() > self.max_entries || st.bytes > self.max_bytes {
            let Some(victim) = st.order.pop_front() else {
                break;
            };
            if let Some(evicted) = st.map.remove(&victim) {
                st.bytes -= evicted.len() as u64;
            }
        }
        true
    }

    pub fn remove(&self, key: &CacheKey) -> bool {
        let mut st = self.inner.write();
        match st.map.remove(key) {
            Some(old) => {
                st.bytes -= old.len() as u64;
                st.order.retain(|k| k != key);
                true
            }
            None => false,
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut st = self.inner.write();
        st.map.clear();
        st.order.clear();
        st.bytes = 0;
    }

    pub fn len(&self) -> usize {
        self.inner.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total payload bytes currently held.
    pub fn total_bytes(&self) -> u64 {
        self.inner.read().bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u32) -> CacheKey {
        CacheKey::derive_str(&format!("https://cdn.example.com/p/{n}.jpg"))
            .unwrap()
            .1
    }

    fn bytes(len: usize) -> MediaBytes {
        Arc::from(vec![7u8; len])
    }

    #[test]
    fn insert_and_get() {
        let store = MemoryStore::new(4, 1024);
        assert!(store.insert(key(1), bytes(10)));
        assert_eq!(store.get(&key(1)).unwrap().len(), 10);
        assert!(store.get(&key(2)).is_none());
    }

    #[test]
    fn entry_ceiling_is_enforced() {
        let store = MemoryStore::new(3, 1024);
        for n in 0..10 {
            store.insert(key(n), bytes(1));
            assert!(store.len() <= 3);
        }
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn byte_ceiling_is_enforced() {
        let store = MemoryStore::new(100, 100);
        for n in 0..10 {
            store.insert(key(n), bytes(30));
            assert!(store.total_bytes() <= 100);
        }
        assert_eq!(store.total_bytes(), 90);
    }

    #[test]
    fn oversized_payload_is_not_stored() {
        let store = MemoryStore::new(10, 100);
        store.insert(key(1), bytes(50));
        assert!(!store.insert(key(2), bytes(101)));
        assert!(store.get(&key(2)).is_none());
        assert!(store.get(&key(1)).is_some());
    }

    #[test]
    fn replacing_a_key_adjusts_cost() {
        let store = MemoryStore::new(10, 100);
        store.insert(key(1), bytes(60));
        store.insert(key(1), bytes(20));
        assert_eq!(store.len(), 1);
        assert_eq!(store.total_bytes(), 20);
        assert_eq!(store.get(&key(1)).unwrap().len(), 20);
    }

    #[test]
    fn remove_and_clear() {
        let store = MemoryStore::new(10, 100);
        store.insert(key(1), bytes(10));
        store.insert(key(2), bytes(10));
        assert!(store.remove(&key(1)));
        assert!(!store.remove(&key(1)));
        assert_eq!(store.total_bytes(), 10);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.total_bytes(), 0);
    }

    #[test]
    fn clones_share_storage() {
        let store = MemoryStore::new(10, 100);
        let other = store.clone();
        store.insert(key(1), bytes(5));
        assert!(other.get(&key(1)).is_some());
    }
}
