//! Unit tests for tandem-output.

use std::fs;
use std::path::Path;

use tandem_core::{Direction, PhaseTag, SimConfig, Team};
use tandem_sim::SimBuilder;

use crate::{CsvWriter, OutputWriter, RobotSnapshotRow, SimOutputObserver, TickSummaryRow};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn sample_snapshot(tick: u64, id: u32) -> RobotSnapshotRow {
    RobotSnapshotRow {
        tick,
        robot_id: id,
        team:     Team::Red,
        row:      3,
        col:      4,
        facing:   Direction::East,
        phase:    PhaseTag::Exploring,
        holding:  false,
        partner:  None,
    }
}

fn sample_summary(tick: u64) -> TickSummaryRow {
    TickSummaryRow {
        tick,
        score_red:        1,
        score_blue:       0,
        pickups_red:      2,
        pickups_blue:     1,
        gold_on_grid:     3,
        pending_messages: 7,
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

// ── CsvWriter ─────────────────────────────────────────────────────────────────

#[test]
fn csv_writer_creates_both_files_with_headers() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = CsvWriter::new(dir.path()).unwrap();
    writer.finish().unwrap();

    let snaps = read_lines(&dir.path().join("robot_snapshots.csv"));
    assert_eq!(
        snaps[0],
        "tick,robot_id,team,row,col,facing,phase,holding,partner"
    );
    let sums = read_lines(&dir.path().join("tick_summaries.csv"));
    assert_eq!(
        sums[0],
        "tick,score_red,score_blue,pickups_red,pickups_blue,gold_on_grid,pending_messages"
    );
}

#[test]
fn csv_writer_rows_round_trip_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = CsvWriter::new(dir.path()).unwrap();
    let mut carried = sample_snapshot(9, 2);
    carried.holding = true;
    carried.partner = Some(5);
    carried.phase = PhaseTag::Carrying;
    writer.write_snapshots(&[sample_snapshot(9, 1), carried]).unwrap();
    writer.write_tick_summary(&sample_summary(9)).unwrap();
    writer.finish().unwrap();

    let snaps = read_lines(&dir.path().join("robot_snapshots.csv"));
    assert_eq!(snaps.len(), 3);
    assert_eq!(snaps[1], "9,1,red,3,4,E,exploring,0,");
    assert_eq!(snaps[2], "9,2,red,3,4,E,carrying,1,5");

    let sums = read_lines(&dir.path().join("tick_summaries.csv"));
    assert_eq!(sums[1], "9,1,0,2,1,3,7");
}

#[test]
fn finish_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = CsvWriter::new(dir.path()).unwrap();
    writer.finish().unwrap();
    writer.finish().unwrap();
}

// ── SimOutputObserver ─────────────────────────────────────────────────────────

#[test]
fn observer_records_a_real_run() {
    let config = SimConfig {
        grid_size:               8,
        gold_count:              3,
        team_size:               2,
        total_ticks:             20,
        seed:                    11,
        message_delay_ticks:     (1, 2),
        snapshot_interval_ticks: 5,
    };
    let mut sim = SimBuilder::new(config).build().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let writer = CsvWriter::new(dir.path()).unwrap();
    let mut observer = SimOutputObserver::new(writer);
    sim.run(&mut observer);
    assert!(observer.take_error().is_none());

    // Snapshots at ticks 0, 5, 10, 15: one row per robot each.
    let snaps = read_lines(&dir.path().join("robot_snapshots.csv"));
    assert_eq!(snaps.len(), 1 + 4 * 4);
    let sums = read_lines(&dir.path().join("tick_summaries.csv"));
    assert_eq!(sums.len(), 1 + 4);

    // Every snapshot row carries a well-formed team column.
    for line in &snaps[1..] {
        let team = line.split(',').nth(2).unwrap();
        assert!(team == "red" || team == "blue");
    }
}
