//! Cached last-known teammate states.
//!
//! There is no global roster a robot may scan.  Instead every robot
//! broadcasts a `StateUpdate` each tick, and receivers fold those into this
//! per-robot directory.  Under message delay the directory is inherently
//! approximate — entries describe where a teammate *was*, one or more ticks
//! ago — so consumers must treat lookups as hints that the protocol's
//! timeouts will correct, never as ground truth.

#[cfg(not(feature = "fx-hash"))]
use std::collections::HashMap;

#[cfg(feature = "fx-hash")]
use rustc_hash::FxHashMap as HashMap;

use tandem_core::{PhaseTag, Pos, RobotId, Tick};

/// One teammate's last broadcast state.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TeammateState {
    pub pos:       Pos,
    pub phase:     PhaseTag,
    pub holding:   bool,
    /// Tick at which the update was *received* (delivery, not send, time).
    pub last_seen: Tick,
}

/// Map from teammate id to its last-known state.
#[derive(Default, Debug)]
pub struct TeammateDirectory {
    map: HashMap<RobotId, TeammateState>,
}

impl TeammateDirectory {
    // Lookups are per-robot and id-keyed, so iteration order never leaks
    // into behavior; the `fx-hash` feature only swaps the hasher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a received state update, replacing any older entry.
    pub fn record(&mut self, id: RobotId, state: TeammateState) {
        self.map.insert(id, state);
    }

    /// Last-known state of `id`, if any update has ever arrived.
    pub fn get(&self, id: RobotId) -> Option<&TeammateState> {
        self.map.get(&id)
    }

    /// Number of teammates heard from so far.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drop everything — used when a robot resets its protocol state after
    /// a long disruption.  Entries repopulate within a delay window.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}
