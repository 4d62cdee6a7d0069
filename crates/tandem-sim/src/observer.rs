//! Simulation observer trait for progress reporting and data collection.
//!
//! The observer is the simulation's entire logging surface: timeouts,
//! drops, conflicts, and scores are reported here as events rather than
//! written to any log directly, so collectors (console printers, CSV
//! writers, test probes) decide what to keep.

use tandem_core::{Pos, RobotId, Team, Tick};
use tandem_grid::Grid;
use tandem_robot::{Robot, RobotEvent};

use crate::scoreboard::{RunSummary, Scoreboard};

// ── Events ────────────────────────────────────────────────────────────────────

/// Why the driver forced a carrying pair to drop its gold.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DropReason {
    /// The partner id was unset or not in the roster.
    PartnerMissing,
    /// The partner no longer holds gold.
    PartnerNotHolding,
    /// The pair ended the move phase on different cells.
    Separated,
    /// The partner points at someone else.
    Asymmetric,
}

impl DropReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DropReason::PartnerMissing    => "partner_missing",
            DropReason::PartnerNotHolding => "partner_not_holding",
            DropReason::Separated         => "separated",
            DropReason::Asymmetric        => "asymmetric",
        }
    }
}

/// One noteworthy thing that happened during a tick.
///
/// All of these are designed outcomes, not failures; see the error-handling
/// notes on [`tandem_core::TandemError`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SimEvent {
    /// Two robots jointly lifted a unit.
    Pickup {
        team: Team,
        pos:  Pos,
        pair: [RobotId; 2],
    },
    /// Both teams raced for a single unit; both lost.
    PickupConflict { pos: Pos },
    /// The driver broke up an incoherent carrying pair.
    Drop {
        pos:    Pos,
        robot:  RobotId,
        reason: DropReason,
    },
    /// A pair scored at its deposit.
    Deposit {
        team: Team,
        pair: [RobotId; 2],
    },
    /// A robot-local protocol event (timeout, vanished gold, new call).
    Protocol {
        robot: RobotId,
        event: RobotEvent,
    },
}

/// Per-tick message-flow counters.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct TickStats {
    /// Inbox insertions this tick (broadcast fan-out counts per recipient).
    pub delivered: usize,
    /// Envelopes handed to the bus this tick.
    pub sent: usize,
    /// Envelopes still in flight after this tick.
    pub pending: usize,
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — console event printer
///
/// ```rust,ignore
/// struct EventPrinter;
///
/// impl SimObserver for EventPrinter {
///     fn on_event(&mut self, tick: Tick, event: &SimEvent) {
///         println!("{tick}: {event:?}");
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before delivery.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called for each noteworthy event, in resolution order.
    fn on_event(&mut self, _tick: Tick, _event: &SimEvent) {}

    /// Called at the end of each tick with message-flow counters.
    fn on_tick_end(&mut self, _tick: Tick, _stats: &TickStats) {}

    /// Called at snapshot intervals (every
    /// `config.snapshot_interval_ticks`) with read-only world state, so
    /// output writers can record the grid and every robot without the sim
    /// knowing about any specific format.
    fn on_snapshot(
        &mut self,
        _tick:   Tick,
        _grid:   &Grid,
        _robots: &[Robot],
        _scores: &Scoreboard,
    ) {
    }

    /// Called once after the final tick.
    fn on_run_end(&mut self, _summary: &RunSummary) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run`
/// but don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
