//! `tandem-grid` — the shared playing field.
//!
//! A square field of gold counts plus the two fixed team deposit cells.
//! Deposit identity is a separate lookup table, never a sentinel value
//! inside the gold-count field, so "how much gold is here" and "is this a
//! deposit" can never be conflated.
//!
//! The grid is passive: robots only read it (through their vision cone),
//! and only the tick driver writes it while resolving pickups and drops.

pub mod grid;


pub use grid::Grid;
