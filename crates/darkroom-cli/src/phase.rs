//! # `darkroom phase`
//!
//! Evaluates an event record at an instant and prints its phase, what the
//! gate allows, and when the phase next changes.
//!
//! ```bash
//! darkroom phase event.json
//! darkroom phase event.json --now 2026-06-02T17:59:59Z --json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use darkroom_core::{Clock, Event, EventId, SystemClock, Timestamp, UserId};
use darkroom_state::{can_capture, can_view_media, EventPhase, ViewerRevealState};
use serde::Serialize;

/// Phase subcommand arguments.
#[derive(Args, Debug)]
pub struct PhaseArgs {
    /// Path to an event record in remote-store JSON form.
    pub event: PathBuf,

    /// Evaluate at this RFC 3339 instant instead of the current time.
    #[arg(long)]
    pub now: Option<String>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// What the gate says about one event at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseReport {
    pub event_id: EventId,
    pub evaluated_at: Timestamp,
    pub phase: EventPhase,
    pub can_capture: bool,
    pub can_view_media: bool,
    pub next_boundary: Option<Timestamp>,
}

/// Build the report for `event` at `now`.
pub fn evaluate(event: &Event, now: Timestamp) -> PhaseReport {
    // Viewing is phase-gated only; the reveal flag does not affect it.
    let reveal = ViewerRevealState::new(UserId::new(), event.id);
    PhaseReport {
        event_id: event.id,
        evaluated_at: now,
        phase: EventPhase::of(event, now),
        can_capture: can_capture(event, now),
        can_view_media: can_view_media(event, &reveal, now),
        next_boundary: EventPhase::next_boundary(&event.schedule, now),
    }
}

/// Execute the phase subcommand.
pub fn run_phase(args: &PhaseArgs) -> Result<u8> {
    let raw = std::fs::read_to_string(&args.event)
        .with_context(|| format!("failed to read {}", args.event.display()))?;
    let event = Event::from_json(&raw)
        .with_context(|| format!("invalid event record in {}", args.event.display()))?;
    let now = match &args.now {
        Some(s) => Timestamp::parse_lenient(s).context("invalid --now")?,
        None => SystemClock.now(),
    };

    let report = evaluate(&event, now);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("event:        {} ({})", event.name, event.id);
        println!("at:           {}", report.evaluated_at);
        println!("phase:        {}", report.phase);
        println!("capture:      {}", yes_no(report.can_capture));
        println!("view media:   {}", yes_no(report.can_view_media));
        match report.next_boundary {
            Some(t) => println!("next change:  {t}"),
            None => println!("next change:  none"),
        }
    }
    Ok(0)
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "allowed"
    } else {
        "denied"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const RECORD: &str = r#"{
        "id": "6c1f8a2e-4b1d-4e8a-9c3b-2f5d7e9a1b3c",
        "name": "Beach day",
        "startsAt": "2026-06-01T10:00:00Z",
        "endsAt": "2026-06-01T16:00:00Z",
        "releaseAt": "2026-06-02T10:00:00Z",
        "joinCode": "K7PH2Q"
    }"#;

    fn event() -> Event {
        Event::from_json(RECORD).unwrap()
    }

    #[test]
    fn live_report() {
        let report = evaluate(&event(), Timestamp::parse("2026-06-01T11:00:00Z").unwrap());
        assert_eq!(report.phase, EventPhase::Live);
        assert!(report.can_capture);
        assert!(!report.can_view_media);
        assert_eq!(
            report.next_boundary,
            Some(Timestamp::parse("2026-06-01T16:00:00Z").unwrap())
        );
    }

    #[test]
    fn revealed_report_has_no_next_boundary() {
        let report = evaluate(&event(), Timestamp::parse("2026-06-02T10:00:00Z").unwrap());
        assert_eq!(report.phase, EventPhase::Revealed);
        assert!(report.can_view_media);
        assert_eq!(report.next_boundary, None);
    }

    #[test]
    fn report_serializes_camel_case() {
        let report = evaluate(&event(), Timestamp::parse("2026-06-01T09:00:00Z").unwrap());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["phase"], "Upcoming");
        assert_eq!(json["canCapture"], false);
        assert!(json.get("nextBoundary").is_some());
    }

    #[test]
    fn run_phase_reads_record_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(RECORD.as_bytes()).unwrap();
        let args = PhaseArgs {
            event: file.path().to_path_buf(),
            now: Some("2026-06-01T12:00:00+02:00".into()),
            json: true,
        };
        assert_eq!(run_phase(&args).unwrap(), 0);
    }

    #[test]
    fn run_phase_rejects_malformed_schedule() {
        let bad = RECORD.replace("2026-06-02T10:00:00Z", "2026-06-01T12:00:00Z");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bad.as_bytes()).unwrap();
        let args = PhaseArgs {
            event: file.path().to_path_buf(),
            now: None,
            json: false,
        };
        assert!(run_phase(&args).is_err());
    }
}
