//! # Temporal Types — UTC Timestamps and Injectable Clocks
//!
//! Defines `Timestamp`, a UTC-only instant with nanosecond precision, and the
//! [`Clock`] trait through which every component obtains "now".
//!
//! ## Precision Invariant
//!
//! Phase boundaries are evaluated with `>=` against the stored instant. A
//! photo becomes visible at exactly `release_at`, and not at
//! `release_at - 1ns`, so timestamps are never truncated.
//!
//! ## Time Injection
//!
//! Phase evaluation takes `now` as an argument. Components that need a
//! running clock (the disk tier stamping entry creation times) receive an
//! `Arc<dyn Clock>`. [`ManualClock`] is the deterministic implementation
//! used in tests and replay.

use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A UTC instant with nanosecond precision.
///
/// # Construction
///
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`.
/// - [`Timestamp::parse()`] — RFC 3339 string, `Z` suffix required.
/// - [`Timestamp::parse_lenient()`] — RFC 3339 string with any offset.
/// - [`Timestamp::from_epoch_nanos()`] — nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from a `chrono::DateTime<Utc>`.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parse a timestamp from an RFC 3339 string.
    ///
    /// **Rejects non-UTC inputs.** Only the `Z` suffix is accepted; explicit
    /// offsets such as `+00:00` or `-04:00` are errors.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if !s.ends_with('Z') {
            return Err(CoreError::InvalidTimestamp(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        Self::parse_lenient(s)
    }

    /// Parse an RFC 3339 string with any offset, converting to UTC.
    ///
    /// Used when ingesting records from the remote event store, which may
    /// serialize with an explicit `+00:00`.
    pub fn parse_lenient(s: &str) -> Result<Self, CoreError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            CoreError::InvalidTimestamp(format!("invalid RFC 3339 timestamp {s:?}: {e}"))
        })?;
        Ok(Self(dt.with_timezone(&Utc)))
    }

    /// Create a timestamp from nanoseconds since the Unix epoch.
    pub fn from_epoch_nanos(nanos: i64) -> Self {
        Self(DateTime::from_timestamp_nanos(nanos))
    }

    /// Create a timestamp from whole seconds since the Unix epoch.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, CoreError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| CoreError::InvalidTimestamp(format!("invalid Unix timestamp: {secs}")))
    }

    /// Convert from a filesystem `SystemTime`.
    pub fn from_system_time(t: SystemTime) -> Self {
        Self(DateTime::<Utc>::from(t))
    }

    /// Convert to a filesystem `SystemTime`.
    pub fn to_system_time(&self) -> SystemTime {
        SystemTime::from(self.0)
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Nanoseconds since the Unix epoch, if representable as `i64`.
    pub fn epoch_nanos(&self) -> Option<i64> {
        self.0.timestamp_nanos_opt()
    }

    /// `self + delta`, or `None` on overflow.
    pub fn checked_add(&self, delta: Duration) -> Option<Self> {
        self.0.checked_add_signed(delta).map(Self)
    }

    /// `self - delta`, or `None` on overflow.
    pub fn checked_sub(&self, delta: Duration) -> Option<Self> {
        self.0.checked_sub_signed(delta).map(Self)
    }

    /// Signed duration from `earlier` to `self`.
    pub fn signed_duration_since(&self, earlier: Timestamp) -> Duration {
        self.0.signed_duration_since(earlier.0)
    }

    /// Render as RFC 3339 with `Z` suffix, including sub-seconds only when present.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

// ─── Clocks ──────────────────────────────────────────────────────────

/// Source of the current instant.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp(Utc::now())
    }
}

/// A settable clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock to `t`. Moving backwards is allowed.
    pub fn set(&self, t: Timestamp) {
        *self.now.lock() = t;
    }

    /// Advance the clock by `delta`, saturating at the representable bound.
    pub fn advance(&self, delta: Duration) {
        let mut guard = self.now.lock();
        if let Some(next) = guard.checked_add(delta) {
            *guard = next;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}
