//! # `darkroom fetch` / `darkroom purge`
//!
//! Both commands open the two-tier cache configured from `DARKROOM_*`
//! environment variables.
//!
//! ```bash
//! DARKROOM_CACHE_DIR=/var/cache/darkroom darkroom fetch https://cdn.example.com/e/1/0001.jpg -o out.jpg
//! DARKROOM_CACHE_DIR=/var/cache/darkroom darkroom purge --disk-only
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use darkroom_cache::{CacheConfig, HttpOrigin, MediaCache};
use darkroom_core::SystemClock;

/// Fetch subcommand arguments.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Absolute media URL.
    pub url: String,

    /// Write the bytes here. Without it only the size is reported.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Purge subcommand arguments.
#[derive(Args, Debug)]
pub struct PurgeArgs {
    /// Leave the memory tier untouched.
    #[arg(long)]
    pub disk_only: bool,
}

fn open_cache(config: &CacheConfig) -> Result<MediaCache<HttpOrigin>> {
    let origin = HttpOrigin::new(Duration::from_secs(config.origin_timeout_secs))
        .context("failed to build HTTP client")?;
    let cache = MediaCache::open(config, Arc::new(SystemClock), origin)
        .with_context(|| format!("failed to open cache at {}", config.root.display()))?;
    Ok(cache)
}

/// Execute the fetch subcommand.
pub async fn run_fetch(args: &FetchArgs, config: &CacheConfig) -> Result<u8> {
    let cache = open_cache(config)?;
    let bytes = cache
        .fetch_str(&args.url)
        .await
        .with_context(|| format!("could not fetch {}", args.url))?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => println!("{} bytes", bytes.len()),
    }

    let stats = cache.stats();
    tracing::info!(
        memory_hits = stats.memory_hits,
        disk_hits = stats.disk_hits,
        origin_fetches = stats.origin_fetches,
        disk_errors = stats.disk_errors,
        disk_evictions = stats.disk_evictions,
        "cache stats"
    );
    Ok(0)
}

/// Execute the purge subcommand.
pub async fn run_purge(args: &PurgeArgs, config: &CacheConfig) -> Result<u8> {
    let cache = open_cache(config)?;
    let removed = if args.disk_only {
        cache.invalidate_disk_only().await?
    } else {
        cache.invalidate_all().await?
    };
    tracing::info!(removed, root = %config.root.display(), "cache purged");
    println!("removed {removed} entries from {}", config.root.display());
    Ok(0)
}
