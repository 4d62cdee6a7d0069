//! goldrush — smallest runnable demo of the tandem simulation.
//!
//! Two teams of four robots race to pair up, haul gold units in lockstep,
//! and bank them at their corner deposits, coordinating only over the
//! delayed message bus.  Per-tick CSV output lands in `./output/`.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use tandem_core::{SimConfig, Team};
use tandem_output::{CsvWriter, SimOutputObserver};
use tandem_sim::SimBuilder;

// ── Constants ─────────────────────────────────────────────────────────────────

const GRID_SIZE:         u16        = 12;
const GOLD_COUNT:        u32        = 8;
const TEAM_SIZE:         usize      = 4;
const TOTAL_TICKS:       u64        = 400;
const SEED:              u64        = 42;
const MESSAGE_DELAY:     (u64, u64) = (1, 4); // ticks, inclusive
const SNAPSHOT_INTERVAL: u64        = 1;
const OUTPUT_DIR:        &str       = "output";

fn main() -> Result<()> {
    let config = SimConfig {
        grid_size:               GRID_SIZE,
        gold_count:              GOLD_COUNT,
        team_size:               TEAM_SIZE,
        total_ticks:             TOTAL_TICKS,
        seed:                    SEED,
        message_delay_ticks:     MESSAGE_DELAY,
        snapshot_interval_ticks: SNAPSHOT_INTERVAL,
    };
    let mut sim = SimBuilder::new(config).build()?;

    fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut observer = SimOutputObserver::new(writer);

    let started = Instant::now();
    let summary = sim.run(&mut observer);
    let elapsed = started.elapsed();

    if let Some(e) = observer.take_error() {
        eprintln!("output error: {e}");
    }

    println!(
        "ran {} ticks in {:.2?} ({} gold initially, {} on the field, {} mid-carry)",
        summary.ticks_run,
        elapsed,
        summary.initial_gold,
        sim.grid.total_gold(),
        sim.carried_gold(),
    );
    println!(
        "red:  score {}  pickups {}",
        summary.scores[Team::Red.index()],
        summary.pickups[Team::Red.index()],
    );
    println!(
        "blue: score {}  pickups {}",
        summary.scores[Team::Blue.index()],
        summary.pickups[Team::Blue.index()],
    );
    match summary.winner() {
        Some(team) => println!("{team} wins!"),
        None       => println!("it's a tie"),
    }

    Ok(())
}
