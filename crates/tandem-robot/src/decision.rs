//! What a robot's tick step produces.

use tandem_comms::{CallId, Envelope};
use tandem_core::{PhaseTag, Pos};

// ── Action ────────────────────────────────────────────────────────────────────

/// The physical action a robot intends this tick.
///
/// Intents are produced by [`Robot::step`][crate::Robot::step] and consumed
/// by the tick driver, which resolves contention (pickup races, carry-pair
/// divergence) before any of them takes effect.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// One step forward in the current facing.  Out-of-bounds steps are
    /// silently swallowed by the driver.
    Move,
    TurnLeft,
    TurnRight,
    /// Attempt a joint pickup at the current cell.  Succeeds only when the
    /// driver sees exactly two same-team robots attempting on a golden cell.
    Pickup,
    #[default]
    Idle,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Move      => "move",
            Action::TurnLeft  => "turn_left",
            Action::TurnRight => "turn_right",
            Action::Pickup    => "pickup",
            Action::Idle      => "idle",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── RobotEvent ────────────────────────────────────────────────────────────────

/// Informational protocol events surfaced to observers.
///
/// None of these are errors: they are the designed local-recovery paths of
/// the protocol.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RobotEvent {
    /// A wait state expired and the robot reverted to exploring.
    TimedOut { phase: PhaseTag },
    /// The gold a robot was committed to is no longer there.
    GoldVanished { pos: Pos },
    /// The robot spotted gold and opened a call for help.
    CallOpened { call: CallId, gold_pos: Pos },
}

// ── Decision ──────────────────────────────────────────────────────────────────

/// The complete output of one FSM step.
#[derive(Debug, Default)]
pub struct Decision {
    /// Physical intent for the driver to resolve.
    pub action: Action,
    /// Envelopes to hand to the bus (delays drawn there, not here).
    pub outbox: Vec<Envelope>,
    /// Informational events for the observer.
    pub events: Vec<RobotEvent>,
}
