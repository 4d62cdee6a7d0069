//! The backend seam: anything that can persist simulation rows.

use crate::{OutputResult, RobotSnapshotRow, TickSummaryRow};

/// A sink for simulation output rows.
///
/// Implementations buffer as they see fit; [`finish`][Self::finish] must
/// flush everything and is safe to call more than once.
pub trait OutputWriter {
    /// Persist a batch of per-robot snapshot rows.
    fn write_snapshots(&mut self, rows: &[RobotSnapshotRow]) -> OutputResult<()>;

    /// Persist one per-tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close the backend.
    fn finish(&mut self) -> OutputResult<()>;
}
