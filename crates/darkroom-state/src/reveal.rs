//! # Viewer Reveal State
//!
//! After an event is revealed each viewer walks through a manual "reveal"
//! ceremony once. Completion is recorded per (user, event) and never reset.
//!
//! The flag is presentation-only: it changes which affordance the gate
//! reports, never whether media may be fetched. It is kept on the device
//! and not synced, so every install runs the ceremony independently.

use std::collections::HashMap;
use std::sync::Arc;

use darkroom_core::{EventId, UserId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Whether one viewer has completed the reveal ceremony for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerRevealState {
    pub user_id: UserId,
    pub event_id: EventId,
    has_completed_reveal: bool,
}

impl ViewerRevealState {
    /// State for a viewer who has not yet completed the ceremony.
    pub fn new(user_id: UserId, event_id: EventId) -> Self {
        Self {
            user_id,
            event_id,
            has_completed_reveal: false,
        }
    }

    pub fn has_completed_reveal(&self) -> bool {
        self.has_completed_reveal
    }

    /// Mark the ceremony complete. Returns `true` only on the first call.
    pub fn complete_reveal(&mut self) -> bool {
        let changed = !self.has_completed_reveal;
        self.has_completed_reveal = true;
        changed
    }
}

/// Device-local store of reveal states.
///
/// Cheaply cloneable; clones share the same map. The lock is never held
/// across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct RevealLedger {
    states: Arc<RwLock<HashMap<(UserId, EventId), ViewerRevealState>>>,
}

impl RevealLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for the pair, if one was ever created.
    pub fn get(&self, user_id: UserId, event_id: EventId) -> Option<ViewerRevealState> {
        self.states.read().get(&(user_id, event_id)).copied()
    }

    /// Return the existing state or create the initial `false` one.
    ///
    /// Call when the viewer first gains `Revealed`-phase access.
    pub fn ensure(&self, user_id: UserId, event_id: EventId) -> ViewerRevealState {
        *self
            .states
            .write()
            .entry((user_id, event_id))
            .or_insert_with(|| ViewerRevealState::new(user_id, event_id))
    }

    /// Record that the viewer finished the ceremony.
    ///
    /// Returns `true` if this call flipped the flag.
    pub fn complete_reveal(&self, user_id: UserId, event_id: EventId) -> bool {
        let mut guard = self.states.write();
        let changed = guard
            .entry((user_id, event_id))
            .or_insert_with(|| ViewerRevealState::new(user_id, event_id))
            .complete_reveal();
        if changed {
            tracing::debug!(%user_id, %event_id, "reveal ceremony completed");
        }
        changed
    }

    pub fn len(&self) -> usize {
        self.states.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.read().is_empty()
    }
}
