//! `tandem-core` — foundational types for the tandem coordination simulation.
//!
//! This crate is a dependency of every other `tandem-*` crate.  It
//! intentionally has no `tandem-*` dependencies and minimal external ones
//! (only `rand` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                      |
//! |------------|-----------------------------------------------|
//! | [`ids`]    | `RobotId`                                     |
//! | [`team`]   | `Team` enum                                   |
//! | [`geom`]   | `Pos`, `Direction`, Manhattan metric          |
//! | [`phase`]  | `PhaseTag` — public summary of the robot FSM  |
//! | [`time`]   | `Tick`, `SimConfig`                           |
//! | [`rng`]    | `RobotRng` (per-robot), `SimRng` (global)     |
//! | [`error`]  | `TandemError`, `TandemResult`                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod geom;
pub mod ids;
pub mod phase;
pub mod rng;
pub mod team;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{TandemError, TandemResult};
pub use geom::{Direction, Pos};
pub use ids::RobotId;
pub use phase::PhaseTag;
pub use rng::{RobotRng, SimRng};
pub use team::Team;
pub use time::{SimConfig, Tick};
