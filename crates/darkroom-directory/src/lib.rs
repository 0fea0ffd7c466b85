//! # darkroom-directory
//!
//! Join-code issuance and resolution for Darkroom events.
//!
//! A join code is the only way a non-member can find an event. The
//! directory therefore exposes exact-match lookup and nothing else: no
//! listing, no prefix or partial match, and no distinguishable answer for
//! deleted events.
//!
//! - [`CodeDirectory`]: `generate`, `resolve`, `register`, `join`,
//!   `event_for_member`, `delete`.
//! - [`EventRegistry`]: point-lookup storage seam, with
//!   [`InMemoryRegistry`] for tests and single-process tools.

pub mod directory;
pub mod error;
pub mod registry;

pub use directory::{CodeDirectory, EventDraft, MAX_CODE_ATTEMPTS};
pub use error::{DirectoryError, RegistryError};
pub use registry::{EventRegistry, InMemoryRegistry};
