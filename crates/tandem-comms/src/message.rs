//! The closed message vocabulary of the finder–helper protocol.

use std::fmt;

use tandem_core::{PhaseTag, Pos, RobotId};

// ── CallId ────────────────────────────────────────────────────────────────────

/// Identity of one call for help.
///
/// A finder stamps every message of a rendezvous with the pair of its own
/// id and a per-finder monotonically increasing sequence number, so calls
/// are globally unique and totally ordered per finder.  Receivers drop any
/// protocol message whose call does not match the one they are engaged in —
/// that single check is what makes arbitrary delay and reordering safe.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallId {
    /// The finder that opened the call.
    pub finder: RobotId,
    /// The finder's call counter at open time.
    pub seq: u32,
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.finder, self.seq)
    }
}

// ── Message ───────────────────────────────────────────────────────────────────

/// Everything a robot can say, one variant per message kind.
///
/// Each variant carries only its required fields; sender and addressing
/// live on the [`Envelope`][crate::Envelope].  `process_messages` in
/// `tandem-robot` dispatches on this exhaustively, so adding a kind is a
/// compile-enforced protocol change.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Message {
    /// Periodic broadcast of the sender's own coarse state; receivers fold
    /// it into their teammate directory.
    StateUpdate {
        pos:     Pos,
        phase:   PhaseTag,
        holding: bool,
    },

    /// Finder broadcast: "I see gold, who will help?"
    Found {
        call:       CallId,
        gold_pos:   Pos,
        finder_pos: Pos,
    },

    /// An explorer volunteering for a call.
    Offer {
        call:   CallId,
        helper: RobotId,
    },

    /// Finder's reply naming the recruited helper.  Volunteers who see a
    /// different `helper` for their call learn they lost the race.
    Accept {
        call:   CallId,
        helper: RobotId,
    },

    /// Helper report: in position on the far side of the gold.
    Arrived {
        call:   CallId,
        helper: RobotId,
    },

    /// Finder's go-signal: both now converge on the gold cell.
    Proceed { call: CallId },
}

impl Message {
    /// Short kind label for event reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::StateUpdate { .. } => "state_update",
            Message::Found { .. }       => "found",
            Message::Offer { .. }       => "offer",
            Message::Accept { .. }      => "accept",
            Message::Arrived { .. }     => "arrived",
            Message::Proceed { .. }     => "proceed",
        }
    }
}
