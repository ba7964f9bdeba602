//! Exactly-once notification tracking.
//!
//! Each notification scope is identified by a cycle key and moves through a
//! two-state automaton:
//!
//! ```text
//!   (absent) ──fire──▶ Fired ──re-arm──▶ Armed ──fire──▶ Fired ...
//! ```
//!
//! An absent key behaves like [`CycleState::Armed`]. Keys are plain strings so
//! the whole map can be persisted inside a user record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::farm::ResourceKind;

/// State of one notification scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleState {
    /// Waiting for the condition to become true.
    Armed,
    /// Already notified during the current cycle.
    Fired,
}

/// Per-user map of cycle key to [`CycleState`].
///
/// # Examples
///
/// ```
/// # use sunwatch::readiness::{NotificationFlags, aggregate_key};
/// # use sunwatch::farm::ResourceKind;
/// let mut flags = NotificationFlags::default();
/// let key = aggregate_key(ResourceKind::Crop);
///
/// assert!(flags.try_fire(&key));
/// assert!(!flags.try_fire(&key));
/// flags.reset_if_not_ready(&key);
/// assert!(flags.try_fire(&key));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationFlags {
    states: BTreeMap<String, CycleState>,
}

impl NotificationFlags {
    /// Current state of `key`, `None` if it was never touched.
    pub fn state(&self, key: &str) -> Option<CycleState> {
        self.states.get(key).copied()
    }

    /// Returns true if the scope is armed, i.e. absent or explicitly re-armed.
    pub fn should_notify(&self, key: &str) -> bool {
        !matches!(self.state(key), Some(CycleState::Fired))
    }

    /// Moves the scope to [`CycleState::Fired`].
    pub fn mark_notified(&mut self, key: &str) {
        self.states.insert(key.to_owned(), CycleState::Fired);
    }

    /// Re-arms the scope once its condition was observed false.
    pub fn reset_if_not_ready(&mut self, key: &str) {
        self.states.insert(key.to_owned(), CycleState::Armed);
    }

    /// Fires the scope if armed. Returns true when the caller must notify.
    pub fn try_fire(&mut self, key: &str) -> bool {
        if !self.should_notify(key) {
            return false;
        }
        self.mark_notified(key);
        true
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Aggregate key of a resource kind, e.g. `crops_ready`.
pub fn aggregate_key(kind: ResourceKind) -> String {
    format!("{}_ready", kind.plural())
}

/// Per-hive production key.
pub fn beehive_key(hive_id: &str) -> String {
    format!("beehive_{}_finished", hive_id)
}

/// Key of the "opens soon" alert of the island event starting at `start_at`.
pub fn island_pre_start_key(start_at: i64) -> String {
    format!("floating_island_pre_start_{}", start_at)
}

/// Key of the "closes soon" alert of the island event ending at `end_at`.
pub fn island_pre_end_key(end_at: i64) -> String {
    format!("floating_island_pre_end_{}", end_at)
}
