//! `tandem-sim` — the tick driver.
//!
//! # Tick anatomy
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Deliver  — drain due envelopes from the bus into per-robot inboxes
//!                (team broadcasts fan out, never across teams).
//!   ② Decide   — every robot, ascending id: observe the start-of-tick
//!                grid, consume its inbox, run the FSM once → one intended
//!                action + staged outbound envelopes.
//!   ③ Pickups  — group pickup intents by (cell, team); exactly two
//!                same-team robots on a golden cell succeed; a cross-team
//!                race on a single unit fails both.
//!   ④ Move     — apply movement intents (out-of-bounds steps no-op).
//!   ⑤ Coherence— every holding robot must have a co-located, holding,
//!                mutual partner; violations drop the gold at the pre-move
//!                cell and reset both robots.
//!   ⑥ Deposits — co-present holding pairs at their deposit score.
//!   ⑦ Send     — staged envelopes go onto the bus with random delays.
//!   Stop early once every gold unit has been deposited.
//! ```
//!
//! No robot's decision can observe another robot's same-tick mutation: the
//! decide phase reads only the start-of-tick grid and the tick's delivered
//! messages, and all writes happen afterwards in a fixed order, so results
//! are deterministic for a given seed.

pub mod builder;
pub mod error;
pub mod observer;
pub mod scoreboard;
pub mod sim;


pub use builder::{RobotSpec, SimBuilder};
pub use error::{SimError, SimResult};
pub use observer::{DropReason, NoopObserver, SimEvent, SimObserver, TickStats};
pub use scoreboard::{RunSummary, Scoreboard};
pub use sim::Sim;
