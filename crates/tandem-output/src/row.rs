//! Plain data row types written by output backends.

use tandem_core::{Direction, PhaseTag, Team};

/// A snapshot of one robot's observable state at a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobotSnapshotRow {
    pub tick:     u64,
    pub robot_id: u32,
    pub team:     Team,
    pub row:      i32,
    pub col:      i32,
    pub facing:   Direction,
    pub phase:    PhaseTag,
    pub holding:  bool,
    /// `None` while unpaired.
    pub partner:  Option<u32>,
}

/// Summary counters for one snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:         u64,
    pub score_red:    u32,
    pub score_blue:   u32,
    pub pickups_red:  u32,
    pub pickups_blue: u32,
    /// Gold still on the field.
    pub gold_on_grid: u32,
    /// Envelopes in flight on the bus.
    pub pending_messages: usize,
}
