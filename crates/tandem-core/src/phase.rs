//! Public summary of a robot's FSM phase.
//!
//! The full state machine (with its protocol sub-states) lives in
//! `tandem-robot` and is private to it.  `PhaseTag` is the coarse view that
//! crosses crate boundaries: it is what robots broadcast in state-update
//! messages, what teammate caches store, and what output rows record.

/// Coarse robot activity, as visible to teammates and observers.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhaseTag {
    /// Random walk, scanning for gold.
    Exploring,
    /// Mid-handshake: any finder/helper negotiation state.
    Negotiating,
    /// Committed to a rendezvous, converging on the gold cell.
    MovingToTarget,
    /// At the gold cell, waiting for the partner.
    WaitingAtTarget,
    /// Both believed present; issuing pickup intents.
    ReadyToPickup,
    /// Holding gold with a partner, heading for the deposit.
    Carrying,
    /// At the deposit cell, holding, awaiting confirmation.
    AtDeposit,
}

impl PhaseTag {
    /// Human-readable label, useful for CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseTag::Exploring       => "exploring",
            PhaseTag::Negotiating     => "negotiating",
            PhaseTag::MovingToTarget  => "moving_to_target",
            PhaseTag::WaitingAtTarget => "waiting_at_target",
            PhaseTag::ReadyToPickup   => "ready_to_pickup",
            PhaseTag::Carrying        => "carrying",
            PhaseTag::AtDeposit       => "at_deposit",
        }
    }
}

impl std::fmt::Display for PhaseTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
