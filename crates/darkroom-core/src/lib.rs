//! # darkroom-core — Foundational Types for the Event Core
//!
//! Every other crate in the workspace depends on `darkroom-core`; it depends
//! on nothing internal. It defines the values that flow between the phase
//! gate, the media cache, and the join-code directory.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `EventId`, `UserId`, `JoinCode` —
//!    no bare strings or UUIDs cross crate boundaries.
//!
//! 2. **UTC-only timestamps at full precision.** Phase boundaries are exact
//!    to the nanosecond, so `Timestamp` never truncates.
//!
//! 3. **Injected time.** Nothing in the workspace reads the wall clock
//!    directly; callers pass a `Timestamp` or a [`Clock`].
//!
//! 4. **Validate at the boundary.** Remote records become [`Event`] values
//!    through [`Event::try_from`], which rejects `startsAt > endsAt` and
//!    `endsAt > releaseAt` before anything downstream sees them.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `darkroom-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod event;
pub mod identity;
pub mod join_code;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::CoreError;
pub use event::{Event, EventRecord, EventSchedule};
pub use identity::{EventId, UserId};
pub use join_code::{JoinCode, JOIN_CODE_ALPHABET, JOIN_CODE_LEN};
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp};
