//! # Code Directory
//!
//! Issues join codes and resolves them back to events.
//!
//! ## Access Rule
//!
//! Read access to an event is granted only to:
//!
//! 1. a recorded member ([`CodeDirectory::event_for_member`]), or
//! 2. a caller presenting the exact code ([`CodeDirectory::resolve`]).
//!
//! Nothing here lists events or matches partial codes.
//!
//! ## Uniform Misses
//!
//! `resolve` normalises its input and performs exactly one exact-match
//! registry lookup whatever the input looks like. An unknown code, a
//! malformed string, and a deleted event's code all take that same path and
//! come back as `Ok(None)`.

use std::sync::Arc;

use darkroom_core::{
    Clock, Event, EventId, EventRecord, EventSchedule, JoinCode, UserId, JOIN_CODE_ALPHABET,
    JOIN_CODE_LEN,
};
use rand::Rng;

use crate::error::{DirectoryError, RegistryError};
use crate::registry::EventRegistry;

/// Attempts before code generation gives up. With a 32^6 code space the
/// chance of needing more than a handful is negligible at any realistic
/// event count.
pub const MAX_CODE_ATTEMPTS: u32 = 32;

/// Fields supplied by the creator of a new event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub schedule: EventSchedule,
    pub is_premium: bool,
    /// Recorded as the first member.
    pub creator: UserId,
}

/// Join-code issuance and lookup over an [`EventRegistry`].
#[derive(Debug, Clone)]
pub struct CodeDirectory<R> {
    registry: R,
    clock: Arc<dyn Clock>,
    max_attempts: u32,
}

impl<R: EventRegistry> CodeDirectory<R> {
    pub fn new(registry: R, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry,
            clock,
            max_attempts: MAX_CODE_ATTEMPTS,
        }
    }

    /// Override the generation attempt limit.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Draw a code not currently held by any event.
    pub fn generate(&self) -> Result<JoinCode, DirectoryError> {
        self.generate_with(&mut rand::thread_rng())
    }

    /// [`generate`](Self::generate) with a caller-supplied random source.
    pub fn generate_with(&self, rng: &mut impl Rng) -> Result<JoinCode, DirectoryError> {
        for attempt in 1..=self.max_attempts {
            let code = draw_code(rng);
            if !self.registry.code_in_use(&code)? {
                return Ok(code);
            }
            tracing::debug!(attempt, "join code collision, redrawing");
        }
        tracing::warn!(attempts = self.max_attempts, "join code generation exhausted");
        Err(DirectoryError::CodeSpaceExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Resolve a user-entered code to its event.
    ///
    /// Returns `Ok(None)` for any input that does not exactly match a
    /// non-deleted event's code.
    pub fn resolve(&self, raw: &str) -> Result<Option<Event>, DirectoryError> {
        let normalised = raw.trim().to_ascii_uppercase();
        let record = self.registry.find_by_code(&normalised)?;
        Ok(record.and_then(live_event))
    }

    /// Create an event under a fresh code and record its creator as a member.
    ///
    /// A collision reported by the registry at insert time is authoritative:
    /// a new code is drawn and the insert retried.
    pub fn register(&self, draft: EventDraft) -> Result<Event, DirectoryError> {
        draft.schedule.validate()?;
        let id = EventId::new();
        let mut rng = rand::thread_rng();

        for _ in 0..self.max_attempts {
            let join_code = self.generate_with(&mut rng)?;
            let event = Event::new(
                id,
                draft.name.clone(),
                draft.schedule,
                join_code,
                draft.is_premium,
            )?;
            match self.registry.insert(EventRecord::from(&event)) {
                Ok(()) => {
                    self.registry.add_member(id, draft.creator)?;
                    tracing::info!(event = %id, "event registered");
                    return Ok(event);
                }
                Err(RegistryError::Collision(code)) => {
                    tracing::debug!(%code, "code taken at insert, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(DirectoryError::CodeSpaceExhausted {
            attempts: self.max_attempts,
        })
    }

    /// Resolve `raw` and record `user` as a member of the matched event.
    pub fn join(&self, raw: &str, user: UserId) -> Result<Option<Event>, DirectoryError> {
        let Some(event) = self.resolve(raw)? else {
            return Ok(None);
        };
        self.registry.add_member(event.id, user)?;
        tracing::debug!(event = %event.id, %user, "member joined");
        Ok(Some(event))
    }

    /// Return the event only if `user` is a recorded member and it is not deleted.
    pub fn event_for_member(
        &self,
        id: EventId,
        user: UserId,
    ) -> Result<Option<Event>, DirectoryError> {
        if !self.registry.is_member(id, user)? {
            return Ok(None);
        }
        Ok(self.registry.get(id)?.and_then(live_event))
    }

    /// Mark an event deleted. Its code stops resolving and is never reissued.
    pub fn delete(&self, id: EventId) -> Result<bool, DirectoryError> {
        let deleted = self.registry.mark_deleted(id, self.clock.now())?;
        if deleted {
            tracing::info!(event = %id, "event deleted");
        }
        Ok(deleted)
    }
}

fn draw_code(rng: &mut impl Rng) -> JoinCode {
    let indices: [usize; JOIN_CODE_LEN] =
        std::array::from_fn(|_| rng.gen_range(0..JOIN_CODE_ALPHABET.len()));
    JoinCode::from_indices(indices)
}

/// Convert a stored record into an event, hiding deleted or invalid rows.
fn live_event(record: EventRecord) -> Option<Event> {
    if record.deleted_at.is_some() {
        return None;
    }
    let id = record.id;
    match Event::try_from(record) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::warn!(event = %id, error = %e, "stored event failed validation, hiding it");
            None
        }
    }
}
