//! `tandem-output` — simulation output writers.
//!
//! A CSV backend producing two files:
//!
//! | File                  | One row per                          |
//! |-----------------------|--------------------------------------|
//! | `robot_snapshots.csv` | robot × snapshot tick                |
//! | `tick_summaries.csv`  | snapshot tick (scores, gold, queue)  |
//!
//! The backend implements [`OutputWriter`] and is driven by
//! [`SimOutputObserver`], which implements `tandem_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tandem_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs);
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{RobotSnapshotRow, TickSummaryRow};
pub use writer::OutputWriter;
