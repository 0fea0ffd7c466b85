//! # darkroom-state — Phase Clock and Access Gate
//!
//! Decides, from wall-clock time alone, who may do what with an event.
//!
//! ## Components
//!
//! - **Phase clock** (`clock.rs`): pure `phase(schedule, now)` evaluation
//!   `Upcoming → Live → Processing → Revealed`, ties resolved toward the
//!   later phase.
//!
//! - **Access gate** (`gate.rs`): `can_capture` (Live only), `can_view_media`
//!   (Revealed only), and the presentational [`Affordance`] derived from the
//!   phase plus the viewer's reveal flag. Malformed schedules fail closed.
//!
//! - **Reveal state** (`reveal.rs`): the per-(user, event)
//!   `has_completed_reveal` flag and the device-local [`RevealLedger`] that
//!   owns it.
//!
//! ## Design
//!
//! Phase is never stored. Every call recomputes it from the schedule and an
//! injected `now`, so two viewers passing the same `now` always agree, and
//! the functions hold no shared state and perform no I/O.

pub mod clock;
pub mod gate;
pub mod reveal;

pub use clock::{phase, EventPhase};
pub use gate::{affordance, can_capture, can_view_media, Affordance};
pub use reveal::{RevealLedger, ViewerRevealState};
