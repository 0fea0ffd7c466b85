//! # darkroom-cache
//!
//! Media delivery for the Darkroom event core. Photo bytes are resolved
//! through a bounded in-memory tier, a byte-budgeted on-disk tier, and
//! finally the remote origin.
//!
//! - [`key`]: stable, filesystem-safe [`CacheKey`] derived from a locator URL.
//! - [`memory`]: bounded [`MemoryStore`].
//! - [`disk`]: [`DiskStore`] with atomic writes and oldest-first eviction.
//! - [`origin`]: the [`Origin`] seam and its HTTP implementation.
//! - [`media`]: [`MediaCache`], the memory → disk → origin resolver.
//! - [`config`]: environment-driven [`CacheConfig`].

pub mod config;
pub mod disk;
pub mod error;
pub mod key;
pub mod media;
pub mod memory;
pub mod origin;
pub mod stats;

use std::sync::Arc;

/// Shared, immutable media payload.
pub type MediaBytes = Arc<[u8]>;

pub use config::CacheConfig;
pub use disk::{DiskEntry, DiskStore};
pub use error::{CacheError, ConfigError, OriginError};
pub use key::{parse_locator, CacheKey};
pub use media::MediaCache;
pub use memory::MemoryStore;
pub use origin::{Backoff, HttpOrigin, Origin};
pub use stats::CacheStats;
