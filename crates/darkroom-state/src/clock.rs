//! # Event Phase Clock
//!
//! Computes an event's lifecycle phase from its schedule and a supplied
//! instant.
//!
//! ## Rule
//!
//! Evaluated in priority order, so at an exact boundary the more open phase
//! wins:
//!
//! 1. `now >= release_at` → `Revealed`
//! 2. `now >= ends_at` → `Processing`
//! 3. `now >= starts_at` → `Live`
//! 4. otherwise → `Upcoming`
//!
//! A photo is therefore visible at the exact release instant, not one tick
//! later. For well-ordered schedules the phase never moves backwards as
//! `now` increases.

use darkroom_core::{Event, EventSchedule, Timestamp};
use serde::{Deserialize, Serialize};

/// Derived lifecycle stage of an event at a given instant.
///
/// Variants are declared in order of openness; the derived `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventPhase {
    /// Capture has not opened.
    Upcoming,
    /// Members may capture photos.
    Live,
    /// Capture closed; photos are developing and hidden.
    Processing,
    /// Photos are visible to every member.
    Revealed,
}

/// Phase of `schedule` at `now`.
#[inline]
pub fn phase(schedule: &EventSchedule, now: Timestamp) -> EventPhase {
    if now >= schedule.release_at {
        EventPhase::Revealed
    } else if now >= schedule.ends_at {
        EventPhase::Processing
    } else if now >= schedule.starts_at {
        EventPhase::Live
    } else {
        EventPhase::Upcoming
    }
}

impl EventPhase {
    /// Phase of `event` at `now`.
    #[inline]
    pub fn of(event: &Event, now: Timestamp) -> Self {
        phase(&event.schedule, now)
    }

    /// Whether no further phase change can happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Revealed)
    }

    /// Instant at which the phase observed at `now` ends, or `None` once revealed.
    ///
    /// Lets a caller schedule one redraw at the boundary instead of polling.
    pub fn next_boundary(schedule: &EventSchedule, now: Timestamp) -> Option<Timestamp> {
        match phase(schedule, now) {
            Self::Upcoming => Some(schedule.starts_at),
            Self::Live => Some(schedule.ends_at),
            Self::Processing => Some(schedule.release_at),
            Self::Revealed => None,
        }
    }
}

impl std::fmt::Display for EventPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Upcoming => "UPCOMING",
            Self::Live => "LIVE",
            Self::Processing => "PROCESSING",
            Self::Revealed => "REVEALED",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn schedule_from(t: Timestamp) -> EventSchedule {
        EventSchedule::new(
            t,
            t.checked_add(Duration::hours(6)).unwrap(),
            t.checked_add(Duration::hours(24)).unwrap(),
        )
        .unwrap()
    }

    fn t0() -> Timestamp {
        Timestamp::parse("2026-06-01T18:00:00Z").unwrap()
    }

    #[test]
    fn before_start_is_upcoming() {
        let s = schedule_from(t0());
        let now = t0().checked_sub(Duration::seconds(1)).unwrap();
        assert_eq!(phase(&s, now), EventPhase::Upcoming);
    }

    #[test]
    fn exact_start_is_live() {
        let s = schedule_from(t0());
        assert_eq!(phase(&s, t0()), EventPhase::Live);
    }

    #[test]
    fn exact_end_is_processing() {
        let s = schedule_from(t0());
        assert_eq!(phase(&s, s.ends_at), EventPhase::Processing);
    }

    #[test]
    fn release_boundary_is_exact_to_the_nanosecond() {
        let s = schedule_from(t0());
        assert_eq!(phase(&s, s.release_at), EventPhase::Revealed);
        let just_before = s.release_at.checked_sub(Duration::nanoseconds(1)).unwrap();
        assert_eq!(phase(&s, just_before), EventPhase::Processing);
    }

    #[test]
    fn collapsed_schedule_jumps_straight_to_revealed() {
        let s = EventSchedule::new(t0(), t0(), t0()).unwrap();
        assert_eq!(phase(&s, t0()), EventPhase::Revealed);
        let before = t0().checked_sub(Duration::nanoseconds(1)).unwrap();
        assert_eq!(phase(&s, before), EventPhase::Upcoming);
    }

    #[test]
    fn next_boundary_walks_the_schedule() {
        let s = schedule_from(t0());
        let early = t0().checked_sub(Duration::hours(1)).unwrap();
        assert_eq!(EventPhase::next_boundary(&s, early), Some(s.starts_at));
        assert_eq!(EventPhase::next_boundary(&s, t0()), Some(s.ends_at));
        assert_eq!(EventPhase::next_boundary(&s, s.ends_at), Some(s.release_at));
        assert_eq!(EventPhase::next_boundary(&s, s.release_at), None);
    }

    #[test]
    fn only_revealed_is_terminal() {
        assert!(EventPhase::Revealed.is_terminal());
        assert!(!EventPhase::Processing.is_terminal());
    }

    #[test]
    fn display_names() {
        assert_eq!(EventPhase::Processing.to_string(), "PROCESSING");
    }

    /// Well-ordered schedule from three non-negative gaps after a base instant.
    fn arb_schedule() -> impl Strategy<Value = EventSchedule> {
        (
            -1_000_000_000_000i64..1_000_000_000_000i64,
            0i64..100_000_000_000,
            0i64..100_000_000_000,
        )
            .prop_map(|(base, live, develop)| {
                let starts_at = Timestamp::from_epoch_nanos(1_780_000_000_000_000_000 + base);
                let ends_at = starts_at.checked_add(Duration::nanoseconds(live)).unwrap();
                let release_at = ends_at.checked_add(Duration::nanoseconds(develop)).unwrap();
                EventSchedule::new(starts_at, ends_at, release_at).unwrap()
            })
    }

    proptest! {
        #[test]
        fn phase_is_monotonic_in_now(
            s in arb_schedule(),
            a in -2_000_000_000_000i64..300_000_000_000i64,
            b in -2_000_000_000_000i64..300_000_000_000i64,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let base = s.starts_at;
            let n1 = base.checked_add(Duration::nanoseconds(lo)).unwrap();
            let n2 = base.checked_add(Duration::nanoseconds(hi)).unwrap();
            prop_assert!(phase(&s, n1) <= phase(&s, n2));
        }

        #[test]
        fn next_boundary_is_in_the_future(
            s in arb_schedule(),
            offset in -2_000_000_000_000i64..300_000_000_000i64,
        ) {
            let now = s.starts_at.checked_add(Duration::nanoseconds(offset)).unwrap();
            if let Some(boundary) = EventPhase::next_boundary(&s, now) {
                prop_assert!(boundary > now);
                prop_assert!(phase(&s, boundary) > phase(&s, now));
            }
        }
    }
}
