//! # Event Registry
//!
//! The persistence seam behind [`CodeDirectory`](crate::CodeDirectory).
//! A production deployment backs it with the remote event store; tests and
//! single-process tools use [`InMemoryRegistry`].
//!
//! The trait offers only point lookups: by event id, by exact code, and by
//! (event, user) membership. There is no listing, range scan, or prefix
//! match.
//!
//! In [`InMemoryRegistry`] a code lookup always costs two map reads. A code
//! that was never issued falls through to a reserved event id that no record
//! can occupy, so a miss and a hit on a deleted event walk the same path.
//!
//! Codes are never released. A deleted event keeps its code reserved, and
//! [`EventRegistry::insert`] reports [`RegistryError::Collision`] for it.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use darkroom_core::{EventId, EventRecord, JoinCode, Timestamp, UserId};

use crate::error::RegistryError;

/// Storage backend for events, their codes, and their members.
pub trait EventRegistry: Send + Sync {
    /// Whether `code` is held by any event, deleted or not.
    fn code_in_use(&self, code: &JoinCode) -> Result<bool, RegistryError>;

    /// Insert a new event. Fails with `Collision` if its code is taken.
    fn insert(&self, record: EventRecord) -> Result<(), RegistryError>;

    /// Exact-match lookup on a normalised code string. Returns the stored
    /// record including any deletion mark.
    fn find_by_code(&self, code: &str) -> Result<Option<EventRecord>, RegistryError>;

    fn get(&self, id: EventId) -> Result<Option<EventRecord>, RegistryError>;

    /// Stamp `deleted_at`. Returns `false` if the event is unknown or
    /// already deleted.
    fn mark_deleted(&self, id: EventId, at: Timestamp) -> Result<bool, RegistryError>;

    fn add_member(&self, event: EventId, user: UserId) -> Result<(), RegistryError>;

    fn is_member(&self, event: EventId, user: UserId) -> Result<bool, RegistryError>;
}

struct Inner {
    /// Target for unknown codes in `find_by_code`. Never inserted.
    miss_slot: EventId,
    events: DashMap<EventId, EventRecord>,
    codes: DashMap<String, EventId>,
    members: DashMap<EventId, HashSet<UserId>>,
}

/// In-process registry backed by `DashMap`.
///
/// Cheaply cloneable via `Arc`; all clones share the same data.
#[derive(Clone)]
pub struct InMemoryRegistry {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for InMemoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRegistry")
            .field("events", &self.inner.events.len())
            .finish()
    }
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                miss_slot: EventId::new(),
                events: DashMap::new(),
                codes: DashMap::new(),
                members: DashMap::new(),
            }),
        }
    }

    /// Number of events ever inserted, including deleted ones.
    pub fn len(&self) -> usize {
        self.inner.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.events.is_empty()
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRegistry for InMemoryRegistry {
    fn code_in_use(&self, code: &JoinCode) -> Result<bool, RegistryError> {
        Ok(self.inner.codes.contains_key(code.as_str()))
    }

    fn insert(&self, record: EventRecord) -> Result<(), RegistryError> {
        if record.id == self.inner.miss_slot {
            return Err(RegistryError::DuplicateEvent(record.id));
        }
        let code = JoinCode::parse(&record.join_code)
            .map_err(|e| RegistryError::Backend(e.to_string()))?;

        // Reserve the code first; the code map is the uniqueness authority.
        match self.inner.codes.entry(code.as_str().to_string()) {
            Entry::Occupied(_) => return Err(RegistryError::Collision(code)),
            Entry::Vacant(slot) => {
                slot.insert(record.id);
            }
        }

        match self.inner.events.entry(record.id) {
            Entry::Occupied(_) => {
                self.inner.codes.remove(code.as_str());
                Err(RegistryError::DuplicateEvent(record.id))
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    fn find_by_code(&self, code: &str) -> Result<Option<EventRecord>, RegistryError> {
        let id = self
            .inner
            .codes
            .get(code)
            .map_or(self.inner.miss_slot, |e| *e.value());
        Ok(self.inner.events.get(&id).map(|e| e.value().clone()))
    }

    fn get(&self, id: EventId) -> Result<Option<EventRecord>, RegistryError> {
        Ok(self.inner.events.get(&id).map(|e| e.value().clone()))
    }

    fn mark_deleted(&self, id: EventId, at: Timestamp) -> Result<bool, RegistryError> {
        match self.inner.events.get_mut(&id) {
            Some(mut record) if record.deleted_at.is_none() => {
                record.deleted_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn add_member(&self, event: EventId, user: UserId) -> Result<(), RegistryError> {
        self.inner.members.entry(event).or_default().insert(user);
        Ok(())
    }

    fn is_member(&self, event: EventId, user: UserId) -> Result<bool, RegistryError> {
        Ok(self
            .inner
            .members
            .get(&event)
            .is_some_and(|m| m.contains(&user)))
    }
}
