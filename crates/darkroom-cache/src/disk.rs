//! # Disk Tier
//!
//! One file per [`CacheKey`] under a root directory the cache owns
//! exclusively. The file name is the key.
//!
//! ## Atomic Writes
//!
//! A put writes a dot-prefixed `*.partial` temporary file in the root and
//! renames it over the final name. Readers see either the previous complete
//! entry or the new complete entry, never a truncated one. Temporary files
//! are invisible to listing, accounting, and eviction.
//!
//! ## Eviction
//!
//! After each put, if the total size of all entries exceeds the budget,
//! entries are sorted by creation time (oldest first, ties by name) and
//! removed one at a time until the total is within budget. Reads do not
//! refresh an entry's age: this is oldest-first, not LRU.
//!
//! Creation time is the file's modification time, stamped from the injected
//! [`Clock`] just before the rename. Entries are write-once, so the stamp
//! is never disturbed afterwards.
//!
//! The rename and the eviction scan hold the same lock. A scan therefore
//! never removes a file that was rewritten after it took its listing.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use darkroom_core::{Clock, Timestamp};
use parking_lot::Mutex;

use crate::error::CacheError;
use crate::key::CacheKey;

const PARTIAL_SUFFIX: &str = ".partial";

/// A complete entry found under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskEntry {
    /// File name relative to the root.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Creation instant used for eviction ordering.
    pub created_at: Timestamp,
}

impl DiskEntry {
    /// The cache key this entry belongs to, if the name is a key.
    pub fn key(&self) -> Option<CacheKey> {
        CacheKey::from_file_name(&self.name)
    }
}

/// Budgeted, oldest-first on-disk tier. Clones share the same root.
#[derive(Debug, Clone)]
pub struct DiskStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    root: PathBuf,
    budget_bytes: u64,
    clock: Arc<dyn Clock>,
    // Held across each rename and each listing-plus-removal scan.
    evict_lock: Mutex<()>,
    evicted: AtomicU64,
}

impl DiskStore {
    /// Open (creating if needed) a store rooted at `root`.
    ///
    /// Stale `*.partial` files left by an interrupted process are removed.
    pub fn open(
        root: impl Into<PathBuf>,
        budget_bytes: u64,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CacheError> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        let mut swept = 0usize;
        for entry in fs::read_dir(&root)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with('.')
                && name.ends_with(PARTIAL_SUFFIX)
                && fs::remove_file(entry.path()).is_ok()
            {
                swept += 1;
            }
        }
        if swept > 0 {
            tracing::info!(root = %root.display(), swept, "removed stale partial cache files");
        }

        Ok(Self {
            inner: Arc::new(Inner {
                root,
                budget_bytes,
                clock,
                evict_lock: Mutex::new(()),
                evicted: AtomicU64::new(0),
            }),
        })
    }

    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    pub fn budget_bytes(&self) -> u64 {
        self.inner.budget_bytes
    }

    /// Number of entries removed by eviction since the store was opened.
    pub fn evicted_count(&self) -> u64 {
        self.inner.evicted.load(Ordering::Relaxed)
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.inner.root.join(key.as_str())
    }

    /// Read the entry for `key`, or `None` if absent.
    pub fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, CacheError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Atomically write the entry for `key`, then evict down to budget.
    ///
    /// A payload larger than the whole budget is not written. Returns the
    /// keys evicted by this call.
    pub fn put(&self, key: &CacheKey, bytes: &[u8]) -> Result<Vec<String>, CacheError> {
        if bytes.len() as u64 > self.inner.budget_bytes {
            tracing::debug!(%key, size = bytes.len(), "payload exceeds disk budget, not cached");
            return Ok(Vec::new());
        }

        fs::create_dir_all(&self.inner.root)?;
        let mut tmp = tempfile::Builder::new()
            .prefix(".")
            .suffix(PARTIAL_SUFFIX)
            .tempfile_in(&self.inner.root)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_data()?;
        tmp.as_file()
            .set_modified(self.inner.clock.now().to_system_time())?;
        {
            let _guard = self.inner.evict_lock.lock();
            tmp.persist(self.path_for(key)).map_err(|e| e.error)?;
        }

        self.evict_to_budget()
    }

    /// Delete the entry for `key`. Returns whether it existed.
    pub fn remove(&self, key: &CacheKey) -> Result<bool, CacheError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// List complete entries with their size and creation time.
    pub fn entries(&self) -> Result<Vec<DiskEntry>, CacheError> {
        let dir = match fs::read_dir(&self.inner.root) {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for entry in dir {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            // Entries can vanish between listing and stat under a concurrent eviction.
            let meta = match entry.metadata() {
                Ok(meta) => meta,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            if !meta.is_file() {
                continue;
            }
            let created = meta
                .modified()
                .or_else(|_| meta.created())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            entries.push(DiskEntry {
                name,
                size: meta.len(),
                created_at: Timestamp::from_system_time(created),
            });
        }
        Ok(entries)
    }

    /// Sum of the sizes of all complete entries.
    pub fn total_size(&self) -> Result<u64, CacheError> {
        Ok(self.entries()?.iter().map(|e| e.size).sum())
    }

    /// Remove oldest entries until the total size is within budget.
    pub fn evict_to_budget(&self) -> Result<Vec<String>, CacheError> {
        let _guard = self.inner.evict_lock.lock();

        let mut entries = self.entries()?;
        let mut total: u64 = entries.iter().map(|e| e.size).sum();
        if total <= self.inner.budget_bytes {
            return Ok(Vec::new());
        }

        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));

        let mut evicted = Vec::new();
        let mut freed = 0u64;
        for entry in entries {
            if total <= self.inner.budget_bytes {
                break;
            }
            match fs::remove_file(self.inner.root.join(&entry.name)) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            total -= entry.size;
            freed += entry.size;
            evicted.push(entry.name);
        }

        self.inner
            .evicted
            .fetch_add(evicted.len() as u64, Ordering::Relaxed);
        tracing::info!(
            root = %self.inner.root.display(),
            evicted = evicted.len(),
            freed_bytes = freed,
            remaining_bytes = total,
            budget_bytes = self.inner.budget_bytes,
            "disk cache evicted oldest entries"
        );
        Ok(evicted)
    }

    /// Delete every entry. Returns how many were removed.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let _guard = self.inner.evict_lock.lock();
        let mut removed = 0;
        for entry in self.entries()? {
            match fs::remove_file(self.inner.root.join(&entry.name)) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        tracing::info!(root = %self.inner.root.display(), removed, "disk cache cleared");
        Ok(removed)
    }
}
