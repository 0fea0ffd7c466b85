//! # darkroom-cli
//!
//! Operator tooling for the Darkroom event core.
//!
//! ## Subcommands
//!
//! - `darkroom phase` — phase, gate decisions, and next boundary for an event record.
//! - `darkroom fetch` — fetch a media URL through the two-tier cache.
//! - `darkroom purge` — clear the disk tier (and memory tier unless `--disk-only`).
//! - `darkroom code` — draw join codes.
//!
//! Cache commands read their configuration from `DARKROOM_CACHE_DIR` and the
//! other `DARKROOM_*` variables.

pub mod code;
pub mod media;
pub mod phase;
