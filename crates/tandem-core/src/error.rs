//! Framework error type.
//!
//! Sub-crates may define their own error enums and convert them into
//! `TandemError` via `From` impls, or keep them separate and wrap
//! `TandemError` as one variant.  Both patterns are acceptable; prefer
//! whichever keeps error sites clean.
//!
//! Note that most "failures" in the simulation are not errors at all:
//! stale messages are dropped, timeouts recover locally, and out-of-bounds
//! actions no-op.  Errors are reserved for construction-time problems.

use thiserror::Error;

use crate::RobotId;

/// The top-level error type for `tandem-core` and a common base for
/// sub-crates.
#[derive(Debug, Error)]
pub enum TandemError {
    #[error("robot {0} not found")]
    RobotNotFound(RobotId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `tandem-*` crates.
pub type TandemResult<T> = Result<T, TandemError>;
