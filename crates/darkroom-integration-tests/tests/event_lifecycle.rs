//! # Event lifecycle across clock, gate, and reveal ledger
//!
//! An event runs T → T+6h capture, develops until T+24h, then reveals.

use chrono::Duration;
use darkroom_core::{Clock, Event, EventId, EventSchedule, JoinCode, ManualClock, Timestamp, UserId};
use darkroom_state::{
    affordance, can_capture, can_view_media, phase, Affordance, EventPhase, RevealLedger,
};
use proptest::prelude::*;

fn t0() -> Timestamp {
    Timestamp::parse("2026-06-01T18:00:00Z").unwrap()
}

fn at(hours: i64) -> Timestamp {
    t0().checked_add(Duration::hours(hours)).unwrap()
}

fn party() -> Event {
    let schedule = EventSchedule::new(at(0), at(6), at(24)).unwrap();
    Event::new(
        EventId::new(),
        "Birthday",
        schedule,
        JoinCode::parse("K7PH2Q").unwrap(),
        false,
    )
    .unwrap()
}

#[test]
fn capture_window_then_reveal() {
    let event = party();
    let viewer = UserId::new();
    let ledger = RevealLedger::new();
    let state = ledger.ensure(viewer, event.id);

    let now = at(1);
    assert_eq!(EventPhase::of(&event, now), EventPhase::Live);
    assert!(can_capture(&event, now));
    assert!(!can_view_media(&event, &state, now));

    let now = at(24);
    assert_eq!(EventPhase::of(&event, now), EventPhase::Revealed);
    assert!(can_view_media(&event, &state, now));
    assert!(!can_capture(&event, now));
}

#[test]
fn release_instant_is_exact_to_the_nanosecond() {
    let event = party();
    let just_before = event
        .schedule
        .release_at
        .checked_sub(Duration::nanoseconds(1))
        .unwrap();
    assert_eq!(phase(&event.schedule, just_before), EventPhase::Processing);
    assert_eq!(phase(&event.schedule, event.schedule.release_at), EventPhase::Revealed);
}

#[test]
fn affordances_follow_a_manual_clock() {
    let event = party();
    let viewer = UserId::new();
    let ledger = RevealLedger::new();
    let clock = ManualClock::new(at(-1));

    let mut seen = Vec::new();
    for step in [2, 8, 16] {
        let state = ledger.ensure(viewer, event.id);
        seen.push(affordance(&event, &state, clock.now()));
        clock.advance(Duration::hours(step));
    }
    let state = ledger.ensure(viewer, event.id);
    seen.push(affordance(&event, &state, clock.now()));
    assert_eq!(
        seen,
        vec![
            Affordance::Countdown,
            Affordance::Camera,
            Affordance::Developing,
            Affordance::RevealCeremony,
        ]
    );

    assert!(ledger.complete_reveal(viewer, event.id));
    let state = ledger.ensure(viewer, event.id);
    assert_eq!(affordance(&event, &state, clock.now()), Affordance::Gallery);

    // Another viewer on the same device still gets the ceremony.
    let other = ledger.ensure(UserId::new(), event.id);
    assert_eq!(affordance(&event, &other, clock.now()), Affordance::RevealCeremony);
}

#[test]
fn mutated_event_fails_closed_everywhere() {
    let mut event = party();
    event.schedule.ends_at = at(30);
    let state = RevealLedger::new().ensure(UserId::new(), event.id);

    for h in [-1, 1, 10, 48] {
        assert!(!can_capture(&event, at(h)));
        assert!(!can_view_media(&event, &state, at(h)));
        assert_eq!(affordance(&event, &state, at(h)), Affordance::Unavailable);
    }
}

#[test]
fn remote_record_with_reversed_window_is_rejected() {
    let json = r#"{
        "id": "0f0e0d0c-0b0a-4908-8706-050403020100",
        "name": "Backwards",
        "startsAt": "2026-06-02T00:00:00Z",
        "endsAt": "2026-06-01T00:00:00Z",
        "releaseAt": "2026-06-03T00:00:00Z",
        "joinCode": "ABCDEF"
    }"#;
    assert!(Event::from_json(json).is_err());
}

proptest! {
    #[test]
    fn phase_never_moves_backward(
        a in 0i64..10_000,
        b in 0i64..10_000,
        c in 0i64..10_000,
        x in -20_000i64..40_000,
        dx in 0i64..20_000,
    ) {
        let mut bounds = [a, b, c];
        bounds.sort_unstable();
        let secs = |s: i64| t0().checked_add(Duration::seconds(s)).unwrap();
        let schedule = EventSchedule::new(secs(bounds[0]), secs(bounds[1]), secs(bounds[2])).unwrap();
        let earlier = phase(&schedule, secs(x));
        let later = phase(&schedule, secs(x + dx));
        prop_assert!(earlier <= later);
    }
}
