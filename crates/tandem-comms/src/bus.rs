//! `MessageBus` — delayed, unordered point-to-point and broadcast delivery.
//!
//! # Why a tick-keyed map
//!
//! Most ticks deliver only a handful of messages.  Keying the pending set
//! by delivery tick (`BTreeMap<Tick, Vec<Envelope>>`) makes each delivery
//! pass O(due) instead of a scan over everything in flight, and draining a
//! key removes the whole batch at once.
//!
//! # Ordering
//!
//! There is deliberately **no ordering guarantee** between messages with
//! different send times or delays: a reply can overtake its request, and a
//! retry can arrive after the conversation it belonged to is long dead.
//! Envelopes that happen to land on the same delivery tick come out in
//! enqueue order, but receivers must not rely on that.

use std::collections::BTreeMap;
use std::mem;

use tandem_core::{SimRng, Tick};

use crate::Envelope;

// ── DelayRange ────────────────────────────────────────────────────────────────

/// Inclusive `[min, max]` delivery delay in ticks.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DelayRange {
    pub min: u64,
    pub max: u64,
}

impl DelayRange {
    /// Every message delivered at the start of the next tick.
    pub const NONE: DelayRange = DelayRange { min: 0, max: 0 };

    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Draw a uniform delay from the range.
    fn sample(self, rng: &mut SimRng) -> u64 {
        if self.min == self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

impl From<(u64, u64)> for DelayRange {
    fn from((min, max): (u64, u64)) -> Self {
        DelayRange::new(min, max)
    }
}

// ── MessageBus ────────────────────────────────────────────────────────────────

/// Schedules envelopes for future delivery with a randomized per-message
/// delay.
///
/// The bus owns its own RNG stream (a [`SimRng`] child) so that delay draws
/// never perturb the rest of the simulation's randomness.
pub struct MessageBus {
    delay:   DelayRange,
    rng:     SimRng,
    pending: BTreeMap<Tick, Vec<Envelope>>,
    /// Cached envelope count for O(1) `pending_count()`.
    total:   usize,
}

impl MessageBus {
    pub fn new(delay: DelayRange, rng: SimRng) -> Self {
        Self {
            delay,
            rng,
            pending: BTreeMap::new(),
            total: 0,
        }
    }

    /// Enqueue `envelope`, drawing a delivery delay in ticks.
    ///
    /// A zero delay schedules for `now`; since the driver's delivery phase
    /// for `now` has already run by the time anything is sent, the envelope
    /// becomes visible at the start of the next tick.
    pub fn send(&mut self, envelope: Envelope, now: Tick) {
        let delay = self.delay.sample(&mut self.rng);
        self.pending.entry(now + delay).or_default().push(envelope);
        self.total += 1;
    }

    /// Remove and return every envelope whose delivery tick has arrived.
    pub fn deliver_due(&mut self, now: Tick) -> Vec<Envelope> {
        // Everything strictly after `now` stays pending.
        let later = self.pending.split_off(&Tick(now.0 + 1));
        let due = mem::replace(&mut self.pending, later);

        let delivered: Vec<Envelope> = due.into_values().flatten().collect();
        self.total -= delivered.len();
        delivered
    }

    /// Envelopes currently in flight.
    pub fn pending_count(&self) -> usize {
        self.total
    }

    /// Earliest scheduled delivery tick, or `None` if nothing is in flight.
    pub fn next_delivery(&self) -> Option<Tick> {
        self.pending.keys().next().copied()
    }
}
