//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use tandem_core::{Team, Tick};
use tandem_grid::Grid;
use tandem_robot::Robot;
use tandem_sim::{RunSummary, Scoreboard, SimObserver, TickStats};

use crate::row::{RobotSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that writes robot snapshots and tick summaries to any
/// [`OutputWriter`] backend.
///
/// Rows are emitted at the sim's snapshot interval.  Message-flow counters
/// arrive via `on_tick_end` (which fires just before `on_snapshot`), so the
/// observer caches the latest stats and folds them into the summary row.
///
/// Errors from the writer are stored internally because `SimObserver`
/// methods have no return value.  After `sim.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_stats: TickStats,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            last_stats: TickStats::default(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, _tick: Tick, stats: &TickStats) {
        self.last_stats = *stats;
    }

    fn on_snapshot(
        &mut self,
        tick:   Tick,
        grid:   &Grid,
        robots: &[Robot],
        scores: &Scoreboard,
    ) {
        let rows: Vec<RobotSnapshotRow> = robots
            .iter()
            .map(|robot| RobotSnapshotRow {
                tick:     tick.0,
                robot_id: robot.id().0,
                team:     robot.team(),
                row:      robot.pos().row,
                col:      robot.pos().col,
                facing:   robot.facing(),
                phase:    robot.phase_tag(),
                holding:  robot.holding(),
                partner:  robot.partner().map(|p| p.0),
            })
            .collect();
        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }

        let summary = TickSummaryRow {
            tick:             tick.0,
            score_red:        scores.score(Team::Red),
            score_blue:       scores.score(Team::Blue),
            pickups_red:      scores.pickups(Team::Red),
            pickups_blue:     scores.pickups(Team::Blue),
            gold_on_grid:     grid.total_gold(),
            pending_messages: self.last_stats.pending,
        };
        let result = self.writer.write_tick_summary(&summary);
        self.store_err(result);
    }

    fn on_run_end(&mut self, _summary: &RunSummary) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
