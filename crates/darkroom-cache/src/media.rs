//! # Media Cache
//!
//! Resolves a locator to bytes through memory → disk → origin, writing back
//! to both tiers on a miss.
//!
//! ## Fetch
//!
//! 1. Derive the [`CacheKey`].
//! 2. Memory hit: return with no disk or network I/O.
//! 3. Disk hit: populate memory, return.
//! 4. Full miss: fetch from the origin, populate memory and disk, return.
//!    An origin failure is returned as [`CacheError::Unavailable`] and
//!    nothing is cached.
//!
//! ## Degradation
//!
//! Disk failures never fail a fetch. A failed read is a miss; a failed
//! write-back is logged and skipped.
//!
//! ## Concurrency
//!
//! There is no per-key in-flight dedup. Concurrent fetches of the same key
//! may each reach the origin; every tier write is atomic and the last writer
//! wins. A caller may drop a fetch at any await point: tier writes are
//! idempotent and the disk write-back runs on the blocking pool to
//! completion.

use std::sync::Arc;

use darkroom_core::Clock;
use url::Url;

use crate::config::CacheConfig;
use crate::disk::DiskStore;
use crate::error::CacheError;
use crate::key::{parse_locator, CacheKey};
use crate::memory::MemoryStore;
use crate::origin::Origin;
use crate::stats::{CacheStats, Counters};
use crate::MediaBytes;

/// Two-tier media cache in front of an [`Origin`].
///
/// Cheaply cloneable; clones share tiers, origin, and counters.
#[derive(Debug)]
pub struct MediaCache<O> {
    memory: MemoryStore,
    disk: DiskStore,
    origin: Arc<O>,
    counters: Arc<Counters>,
}

impl<O> Clone for MediaCache<O> {
    fn clone(&self) -> Self {
        Self {
            memory: self.memory.clone(),
            disk: self.disk.clone(),
            origin: Arc::clone(&self.origin),
            counters: Arc::clone(&self.counters),
        }
    }
}

impl<O: Origin + 'static> MediaCache<O> {
    /// Assemble a cache from explicitly constructed tiers.
    pub fn new(memory: MemoryStore, disk: DiskStore, origin: O) -> Self {
        Self {
            memory,
            disk,
            origin: Arc::new(origin),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Build both tiers from `config`, opening the disk root.
    pub fn open(config: &CacheConfig, clock: Arc<dyn Clock>, origin: O) -> Result<Self, CacheError> {
        config.validate()?;
        let memory = MemoryStore::new(config.memory_max_entries, config.memory_max_bytes);
        let disk = DiskStore::open(&config.root, config.disk_budget_bytes, clock)?;
        Ok(Self::new(memory, disk, origin))
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn disk(&self) -> &DiskStore {
        &self.disk
    }

    /// Resolve `locator` to bytes.
    pub async fn fetch(&self, locator: &Url) -> Result<MediaBytes, CacheError> {
        let key = CacheKey::derive(locator);

        if let Some(bytes) = self.memory.get(&key) {
            Counters::bump(&self.counters.memory_hits);
            tracing::debug!(%key, "memory hit");
            return Ok(bytes);
        }

        if let Some(found) = self.disk_get(&key).await {
            Counters::bump(&self.counters.disk_hits);
            tracing::debug!(%key, size = found.len(), "disk hit");
            let bytes: MediaBytes = Arc::from(found);
            self.memory.insert(key, Arc::clone(&bytes));
            return Ok(bytes);
        }

        Counters::bump(&self.counters.origin_fetches);
        tracing::debug!(%key, %locator, "cache miss, fetching from origin");
        let body = match self.origin.fetch(locator).await {
            Ok(body) => body,
            Err(source) => {
                Counters::bump(&self.counters.origin_failures);
                tracing::warn!(%locator, error = %source, "origin fetch failed");
                return Err(CacheError::Unavailable {
                    locator: locator.to_string(),
                    source,
                });
            }
        };

        let bytes: MediaBytes = Arc::from(body);
        self.memory.insert(key.clone(), Arc::clone(&bytes));
        self.disk_put(key, Arc::clone(&bytes)).await;
        Ok(bytes)
    }

    /// Parse `raw` as a locator and fetch it.
    pub async fn fetch_str(&self, raw: &str) -> Result<MediaBytes, CacheError> {
        let locator = parse_locator(raw)?;
        self.fetch(&locator).await
    }

    /// Drop every cached entry in both tiers. Returns the number of disk entries removed.
    pub async fn invalidate_all(&self) -> Result<usize, CacheError> {
        self.memory.clear();
        self.invalidate_disk_only().await
    }

    /// Drop every disk entry, leaving the memory tier intact.
    pub async fn invalidate_disk_only(&self) -> Result<usize, CacheError> {
        let disk = self.disk.clone();
        tokio::task::spawn_blocking(move || disk.clear())
            .await
            .map_err(|e| CacheError::Task(e.to_string()))?
    }

    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.disk.evicted_count())
    }

    async fn disk_get(&self, key: &CacheKey) -> Option<Vec<u8>> {
        let disk = self.disk.clone();
        let k = key.clone();
        let result = tokio::task::spawn_blocking(move || disk.get(&k))
            .await
            .map_err(|e| CacheError::Task(e.to_string()))
            .and_then(|r| r);
        match result {
            Ok(found) => found,
            Err(error) => {
                Counters::bump(&self.counters.disk_errors);
                tracing::warn!(%key, %error, "disk read failed, treating as miss");
                None
            }
        }
    }

    async fn disk_put(&self, key: CacheKey, bytes: MediaBytes) {
        let disk = self.disk.clone();
        let k = key.clone();
        let result = tokio::task::spawn_blocking(move || disk.put(&k, &bytes))
            .await
            .map_err(|e| CacheError::Task(e.to_string()))
            .and_then(|r| r);
        if let Err(error) = result {
            Counters::bump(&self.counters.disk_errors);
            tracing::warn!(%key, %error, "disk write-back failed, entry not persisted");
        }
    }
}
