//! # Access Gate
//!
//! Combines the event phase with the viewer's reveal state to decide what a
//! viewer may request.
//!
//! | Phase        | capture | view media |
//! |--------------|---------|------------|
//! | `Upcoming`   | no      | no         |
//! | `Live`       | yes     | no         |
//! | `Processing` | no      | no         |
//! | `Revealed`   | no      | yes        |
//!
//! ## Fail Closed
//!
//! A schedule with `starts_at > ends_at` or `ends_at > release_at` has no
//! defined phase. Both permissions are denied for it rather than guessed.
//!
//! ## Reveal Flag
//!
//! `has_completed_reveal` does not gate media access; the origin serves
//! media to any member once revealed. It only selects between the
//! [`Affordance::RevealCeremony`] and [`Affordance::Gallery`] views.

use darkroom_core::{Event, Timestamp};
use serde::{Deserialize, Serialize};

use crate::clock::{phase, EventPhase};
use crate::reveal::ViewerRevealState;

/// What a client should present for an event right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Affordance {
    /// Before capture opens.
    Countdown,
    /// Camera is available.
    Camera,
    /// Capture closed, photos hidden until release.
    Developing,
    /// Photos are released; the viewer has not run the ceremony.
    RevealCeremony,
    /// Photos are released and the viewer has seen the ceremony.
    Gallery,
    /// Schedule is malformed; nothing is offered.
    Unavailable,
}

fn checked_phase(event: &Event, now: Timestamp) -> Option<EventPhase> {
    if !event.schedule.is_well_ordered() {
        tracing::warn!(
            event_id = %event.id,
            starts_at = %event.schedule.starts_at,
            ends_at = %event.schedule.ends_at,
            release_at = %event.schedule.release_at,
            "malformed event schedule, denying access"
        );
        return None;
    }
    Some(phase(&event.schedule, now))
}

/// Whether members may capture photos at `now`. True iff the phase is `Live`.
pub fn can_capture(event: &Event, now: Timestamp) -> bool {
    checked_phase(event, now) == Some(EventPhase::Live)
}

/// Whether the viewer may fetch media at `now`. True iff the phase is `Revealed`.
pub fn can_view_media(event: &Event, _reveal: &ViewerRevealState, now: Timestamp) -> bool {
    checked_phase(event, now) == Some(EventPhase::Revealed)
}

/// Presentation affordance for the viewer at `now`.
///
/// A reveal state recorded for a different event counts as not completed.
pub fn affordance(event: &Event, reveal: &ViewerRevealState, now: Timestamp) -> Affordance {
    match checked_phase(event, now) {
        None => Affordance::Unavailable,
        Some(EventPhase::Upcoming) => Affordance::Countdown,
        Some(EventPhase::Live) => Affordance::Camera,
        Some(EventPhase::Processing) => Affordance::Developing,
        Some(EventPhase::Revealed) => {
            if reveal.event_id == event.id && reveal.has_completed_reveal() {
                Affordance::Gallery
            } else {
                Affordance::RevealCeremony
            }
        }
    }
}
