//! # Events and Schedules
//!
//! An event is a time-boxed capture session. Its [`EventSchedule`] holds
//! three instants that must satisfy `starts_at <= ends_at <= release_at`:
//!
//! ```text
//!   starts_at            ends_at                 release_at
//! ──────┼───────────────────┼────────────────────────┼──────────▶ time
//!  Upcoming │      Live      │      Processing        │  Revealed
//! ```
//!
//! ## Boundary Validation
//!
//! Remote records arrive as loosely-typed JSON ([`EventRecord`]). The
//! conversion into [`Event`] is the single place the ordering invariant is
//! checked. Downstream gates still re-check it because `Event` fields are
//! public and a caller can mutate a validated value.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::identity::EventId;
use crate::join_code::JoinCode;
use crate::temporal::Timestamp;

/// The three instants that drive an event's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventSchedule {
    /// Capture opens.
    pub starts_at: Timestamp,
    /// Capture closes; photos start developing.
    pub ends_at: Timestamp,
    /// Photos become visible to every member.
    pub release_at: Timestamp,
}

impl EventSchedule {
    /// Build a schedule, rejecting out-of-order instants.
    pub fn new(
        starts_at: Timestamp,
        ends_at: Timestamp,
        release_at: Timestamp,
    ) -> Result<Self, CoreError> {
        let schedule = Self {
            starts_at,
            ends_at,
            release_at,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Whether `starts_at <= ends_at <= release_at`.
    pub fn is_well_ordered(&self) -> bool {
        self.starts_at <= self.ends_at && self.ends_at <= self.release_at
    }

    /// Return `MalformedSchedule` unless the instants are ordered.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.is_well_ordered() {
            Ok(())
        } else {
            Err(CoreError::MalformedSchedule {
                starts_at: self.starts_at,
                ends_at: self.ends_at,
                release_at: self.release_at,
            })
        }
    }
}

/// A validly-created event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Identity assigned by the remote store.
    pub id: EventId,
    /// Display name.
    pub name: String,
    /// Lifecycle instants.
    pub schedule: EventSchedule,
    /// Code that lets non-members look this event up. Immutable once assigned.
    pub join_code: JoinCode,
    /// Exempts the event from free-tier auto-expiry. Not consulted by this core.
    pub is_premium: bool,
}

impl Event {
    /// Create an event, validating the schedule ordering.
    pub fn new(
        id: EventId,
        name: impl Into<String>,
        schedule: EventSchedule,
        join_code: JoinCode,
        is_premium: bool,
    ) -> Result<Self, CoreError> {
        schedule.validate()?;
        Ok(Self {
            id,
            name: name.into(),
            schedule,
            join_code,
            is_premium,
        })
    }

    /// Parse a remote-store JSON payload into a validated event.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let record: EventRecord = serde_json::from_str(json)?;
        Self::try_from(record)
    }
}

/// Event row as served by the remote event store.
///
/// Field names follow the store's camelCase JSON. `deleted_at` marks a
/// soft-deleted event whose code must no longer resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: EventId,
    pub name: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub release_at: Timestamp,
    pub join_code: String,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub deleted_at: Option<Timestamp>,
}

impl TryFrom<EventRecord> for Event {
    type Error = CoreError;

    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        let schedule = EventSchedule::new(record.starts_at, record.ends_at, record.release_at)?;
        let join_code = JoinCode::parse(&record.join_code)?;
        Event::new(record.id, record.name, schedule, join_code, record.is_premium)
    }
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            name: event.name.clone(),
            starts_at: event.schedule.starts_at,
            ends_at: event.schedule.ends_at,
            release_at: event.schedule.release_at,
            join_code: event.join_code.to_string(),
            is_premium: event.is_premium,
            deleted_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    #[test]
    fn schedule_accepts_equal_instants() {
        let t = ts("2026-06-01T18:00:00Z");
        let schedule = EventSchedule::new(t, t, t).unwrap();
        assert!(schedule.is_well_ordered());
    }

    #[test]
    fn schedule_rejects_start_after_end() {
        let err = EventSchedule::new(
            ts("2026-06-01T20:00:00Z"),
            ts("2026-06-01T18:00:00Z"),
            ts("2026-06-02T18:00:00Z"),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::MalformedSchedule { .. }));
    }

    #[test]
    fn schedule_rejects_end_after_release() {
        assert!(EventSchedule::new(
            ts("2026-06-01T18:00:00Z"),
            ts("2026-06-03T00:00:00Z"),
            ts("2026-06-02T18:00:00Z"),
        )
        .is_err());
    }

    #[test]
    fn record_with_offsets_converts() {
        let json = r#"{
            "id": "6f1c1c3e-5d0e-4a43-9e55-0b8a4f1b2c3d",
            "name": "Rooftop party",
            "startsAt": "2026-06-01T18:00:00+00:00",
            "endsAt": "2026-06-02T00:00:00Z",
            "releaseAt": "2026-06-02T18:00:00Z",
            "joinCode": "k7ph2q",
            "isPremium": true,
            "likesCount": 12
        }"#;
        let event = Event::from_json(json).unwrap();
        assert_eq!(event.name, "Rooftop party");
        assert_eq!(event.join_code.as_str(), "K7PH2Q");
        assert!(event.is_premium);
        assert_eq!(event.schedule.starts_at, ts("2026-06-01T18:00:00Z"));
    }

    #[test]
    fn record_with_bad_ordering_rejected_at_boundary() {
        let json = r#"{
            "id": "6f1c1c3e-5d0e-4a43-9e55-0b8a4f1b2c3d",
            "name": "Backwards",
            "startsAt": "2026-06-02T18:00:00Z",
            "endsAt": "2026-06-02T00:00:00Z",
            "releaseAt": "2026-06-02T18:00:00Z",
            "joinCode": "K7PH2Q"
        }"#;
        assert!(matches!(
            Event::from_json(json),
            Err(CoreError::MalformedSchedule { .. })
        ));
    }

    #[test]
    fn record_with_bad_code_rejected() {
        let json = r#"{
            "id": "6f1c1c3e-5d0e-4a43-9e55-0b8a4f1b2c3d",
            "name": "Bad code",
            "startsAt": "2026-06-01T18:00:00Z",
            "endsAt": "2026-06-02T00:00:00Z",
            "releaseAt": "2026-06-02T18:00:00Z",
            "joinCode": "O0I1"
        }"#;
        assert!(matches!(
            Event::from_json(json),
            Err(CoreError::InvalidJoinCode(_))
        ));
    }

    #[test]
    fn missing_field_is_serialization_error() {
        assert!(matches!(
            Event::from_json(r#"{"name": "x"}"#),
            Err(CoreError::Serialization(_))
        ));
    }
}
