//! Simulation time model.
//!
//! Time is a monotonically increasing `Tick` counter and nothing else: one
//! tick is one synchronous round of deliver → decide → resolve.  There is no
//! wall-clock mapping — delays, timeouts, and budgets are all expressed in
//! ticks, so schedule arithmetic is exact and comparisons are O(1).

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
///
/// Stored as `u64`; no realistic run length can overflow it.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// A plain parameter struct, not a protocol: the application crate fills it
/// (from constants or a config file) and hands it to the simulation builder,
/// which validates it.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Side length of the square grid.
    pub grid_size: u16,

    /// Gold units scattered at simulation start.
    pub gold_count: u32,

    /// Robots per team (two teams, so the roster is `2 * team_size`).
    pub team_size: usize,

    /// Tick budget.  The run also ends early once every gold unit has been
    /// deposited.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,

    /// `(min, max)` message delivery delay in ticks, inclusive on both
    /// ends.  `(0, 0)` means every message is visible at the start of the
    /// next tick.
    pub message_delay_ticks: (u64, u64),

    /// Call `on_snapshot` every N ticks.  `0` disables snapshots.
    pub snapshot_interval_ticks: u64,
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Total roster size across both teams.
    #[inline]
    pub fn robot_count(&self) -> usize {
        self.team_size * 2
    }
}
