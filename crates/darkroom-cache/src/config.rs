//! Media cache configuration.
//!
//! Defaults are a 100 MiB disk budget and a small memory tier. Override via
//! environment variables, or construct explicitly in tests.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Disk tier byte budget (100 MiB).
pub const DEFAULT_DISK_BUDGET_BYTES: u64 = 100 * 1024 * 1024;

/// Memory tier entry ceiling.
pub const DEFAULT_MEMORY_MAX_ENTRIES: usize = 256;

/// Memory tier byte-cost ceiling (64 MiB).
pub const DEFAULT_MEMORY_MAX_BYTES: u64 = 64 * 1024 * 1024;

/// Origin request timeout.
pub const DEFAULT_ORIGIN_TIMEOUT_SECS: u64 = 30;

/// Configuration for the two-tier media cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Directory exclusively owned by the disk tier.
    pub root: PathBuf,
    /// Aggregate on-disk size above which oldest entries are evicted.
    pub disk_budget_bytes: u64,
    /// Maximum number of entries held in memory.
    pub memory_max_entries: usize,
    /// Maximum total payload bytes held in memory.
    pub memory_max_bytes: u64,
    /// Timeout applied to each origin request.
    pub origin_timeout_secs: u64,
}

impl CacheConfig {
    /// Default limits rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            disk_budget_bytes: DEFAULT_DISK_BUDGET_BYTES,
            memory_max_entries: DEFAULT_MEMORY_MAX_ENTRIES,
            memory_max_bytes: DEFAULT_MEMORY_MAX_BYTES,
            origin_timeout_secs: DEFAULT_ORIGIN_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `DARKROOM_CACHE_DIR` (required)
    /// - `DARKROOM_DISK_BUDGET_BYTES` (default: 104857600)
    /// - `DARKROOM_MEMORY_MAX_ENTRIES` (default: 256)
    /// - `DARKROOM_MEMORY_MAX_BYTES` (default: 67108864)
    /// - `DARKROOM_ORIGIN_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let root = lookup("DARKROOM_CACHE_DIR")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingCacheDir)?;

        let config = Self {
            root: PathBuf::from(root),
            disk_budget_bytes: parse_var(
                &lookup,
                "DARKROOM_DISK_BUDGET_BYTES",
                DEFAULT_DISK_BUDGET_BYTES,
            )?,
            memory_max_entries: parse_var(
                &lookup,
                "DARKROOM_MEMORY_MAX_ENTRIES",
                DEFAULT_MEMORY_MAX_ENTRIES,
            )?,
            memory_max_bytes: parse_var(
                &lookup,
                "DARKROOM_MEMORY_MAX_BYTES",
                DEFAULT_MEMORY_MAX_BYTES,
            )?,
            origin_timeout_secs: parse_var(
                &lookup,
                "DARKROOM_ORIGIN_TIMEOUT_SECS",
                DEFAULT_ORIGIN_TIMEOUT_SECS,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject zero budgets and ceilings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.disk_budget_bytes == 0 {
            return Err(ConfigError::Zero("disk_budget_bytes"));
        }
        if self.memory_max_entries == 0 {
            return Err(ConfigError::Zero("memory_max_entries"));
        }
        if self.memory_max_bytes == 0 {
            return Err(ConfigError::Zero("memory_max_bytes"));
        }
        if self.origin_timeout_secs == 0 {
            return Err(ConfigError::Zero("origin_timeout_secs"));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
            var: var.to_string(),
            value: raw,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn new_uses_default_budget() {
        let cfg = CacheConfig::new("/tmp/media");
        assert_eq!(cfg.disk_budget_bytes, 104_857_600);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn lookup_requires_cache_dir() {
        assert!(matches!(
            CacheConfig::from_lookup(lookup_from(&[])),
            Err(ConfigError::MissingCacheDir)
        ));
        assert!(matches!(
            CacheConfig::from_lookup(lookup_from(&[("DARKROOM_CACHE_DIR", "  ")])),
            Err(ConfigError::MissingCacheDir)
        ));
    }

    #[test]
    fn lookup_applies_overrides_and_defaults() {
        let cfg = CacheConfig::from_lookup(lookup_from(&[
            ("DARKROOM_CACHE_DIR", "/var/cache/darkroom"),
            ("DARKROOM_DISK_BUDGET_BYTES", "1024"),
            ("DARKROOM_MEMORY_MAX_ENTRIES", " 8 "),
        ]))
        .unwrap();
        assert_eq!(cfg.root, PathBuf::from("/var/cache/darkroom"));
        assert_eq!(cfg.disk_budget_bytes, 1024);
        assert_eq!(cfg.memory_max_entries, 8);
        assert_eq!(cfg.memory_max_bytes, DEFAULT_MEMORY_MAX_BYTES);
        assert_eq!(cfg.origin_timeout_secs, DEFAULT_ORIGIN_TIMEOUT_SECS);
    }

    #[test]
    fn lookup_rejects_garbage_numbers() {
        let result = CacheConfig::from_lookup(lookup_from(&[
            ("DARKROOM_CACHE_DIR", "/c"),
            ("DARKROOM_MEMORY_MAX_BYTES", "64MB"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidNumber { .. })));
    }

    #[test]
    fn lookup_rejects_zero_budget() {
        let result = CacheConfig::from_lookup(lookup_from(&[
            ("DARKROOM_CACHE_DIR", "/c"),
            ("DARKROOM_DISK_BUDGET_BYTES", "0"),
        ]));
        assert!(matches!(result, Err(ConfigError::Zero("disk_budget_bytes"))));
    }
}
