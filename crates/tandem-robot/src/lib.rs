//! `tandem-robot` — the coordination core.
//!
//! One robot is one finite state machine.  Each tick the driver hands it a
//! read-only view of the grid, its drained inbox, and its own RNG; the
//! robot mutates only itself and returns a [`Decision`]: one physical
//! action intent plus any outbound envelopes.  All pairing runs over the
//! finder–helper rendezvous protocol — there is no shared memory and no
//! global roster, only messages and a per-robot cache of teammate state.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`robot`]     | `Robot` state + coordinator-facing atomic transitions   |
//! | [`fsm`]       | per-tick `step`: phase logic, steering, timeouts        |
//! | [`protocol`]  | finder–helper message handling                          |
//! | [`vision`]    | forward vision cone                                     |
//! | [`directory`] | cached last-known teammate states                       |
//! | [`decision`]  | `Action`, `Decision`, `RobotEvent`                      |
//!
//! # The handshake at a glance
//!
//! ```text
//! finder                               helper
//!   see gold
//!   Found ──(team broadcast)──────────▶  offer help
//!           ◀───────────────── Offer
//!   recruit first offer
//!   Accept ──(team broadcast)─────────▶  move to far side of gold
//!           ◀─────────────── Arrived      (losers revert on mismatch)
//!   start converging
//!   Proceed ─────────────────────────▶  converge too
//!        both wait at the gold cell, then issue pickup intents
//! ```
//!
//! Every wait state has a retry/timeout counter; expiry either re-sends
//! the blocking message or reverts cleanly to exploring.  Stale messages
//! (wrong call, wrong phase, wrong robot) are dropped without comment.

pub mod decision;
pub mod directory;
pub mod fsm;
pub mod protocol;
pub mod robot;
pub mod vision;

#[cfg(test)]
mod tests;

pub use decision::{Action, Decision, RobotEvent};
pub use directory::{TeammateDirectory, TeammateState};
pub use fsm::{
    DEPOSIT_WAIT_TICKS, PICKUP_WAIT_TICKS, PROTOCOL_RETRY_TICKS, TURN_PROBABILITY,
    WAIT_AT_GOLD_TICKS,
};
pub use robot::Robot;
pub use vision::visible_positions;
