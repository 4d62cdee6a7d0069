//! Robot state and the coordinator-facing transitions.

use tandem_comms::CallId;
use tandem_core::{Direction, PhaseTag, Pos, RobotId, Team};

use crate::directory::TeammateDirectory;
use crate::Action;

// ── Phase ─────────────────────────────────────────────────────────────────────

/// The full (crate-internal) state machine.
///
/// The `Finder*`/`Helper*` states are the rendezvous handshake; everything
/// from `MovingToTarget` on is common to both roles.  Externally only the
/// coarse [`PhaseTag`] is visible.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Phase {
    Exploring,
    /// Broadcast `Found`, collecting offers.
    FinderAwaitOffer,
    /// Recruited a helper, waiting for its `Arrived`.
    FinderAwaitArrival,
    /// Helper in position; steer to the gold, send `Proceed` on the first
    /// forward step.
    FinderConverge,
    /// Sent an `Offer`, waiting to be (or not be) recruited.
    HelperAwaitAccept {
        /// Finder position from the `Found` broadcast; fixes the flank cell.
        finder_pos: Pos,
    },
    /// Recruited: move to the far side of the gold.
    HelperFlank { flank: Pos },
    /// In position, `Arrived` sent, waiting for `Proceed`.
    HelperAwaitProceed,
    /// Converging on the gold cell.
    MovingToTarget,
    /// At the gold cell, waiting for the partner to show up.
    WaitingAtTarget,
    /// Partner believed present; issuing pickup intents.
    ReadyToPickup,
    /// Holding gold, in lockstep with the partner, heading for the deposit.
    Carrying,
    /// At the deposit, holding, waiting for the driver's confirmation.
    AtDeposit,
}

impl Phase {
    /// Coarse public view, as broadcast to teammates and observers.
    pub(crate) fn tag(self) -> PhaseTag {
        match self {
            Phase::Exploring             => PhaseTag::Exploring,
            Phase::FinderAwaitOffer
            | Phase::FinderAwaitArrival
            | Phase::FinderConverge
            | Phase::HelperAwaitAccept { .. }
            | Phase::HelperFlank { .. }
            | Phase::HelperAwaitProceed  => PhaseTag::Negotiating,
            Phase::MovingToTarget        => PhaseTag::MovingToTarget,
            Phase::WaitingAtTarget       => PhaseTag::WaitingAtTarget,
            Phase::ReadyToPickup         => PhaseTag::ReadyToPickup,
            Phase::Carrying              => PhaseTag::Carrying,
            Phase::AtDeposit             => PhaseTag::AtDeposit,
        }
    }
}

// ── Robot ─────────────────────────────────────────────────────────────────────

/// One robot: identity, pose, belief state, and FSM bookkeeping.
///
/// Mutated exclusively by its own [`step`][Robot::step] and by the driver's
/// pair transitions ([`confirm_pickup`][Robot::confirm_pickup],
/// [`force_drop`][Robot::force_drop],
/// [`confirm_deposit`][Robot::confirm_deposit]), which the driver applies
/// to both partners within a single resolution step so no one ever
/// observes a half-updated pair.
pub struct Robot {
    pub(crate) id:        RobotId,
    pub(crate) team:      Team,
    pub(crate) pos:       Pos,
    pub(crate) facing:    Direction,
    pub(crate) grid_size: u16,

    pub(crate) phase:   Phase,
    pub(crate) holding: bool,
    pub(crate) partner: Option<RobotId>,
    /// The gold cell this robot is committed to, while paired or pairing.
    pub(crate) target:  Option<Pos>,

    /// Per-finder monotonic call counter; with the robot id it makes every
    /// [`CallId`] this robot opens globally unique.
    pub(crate) call_seq: u32,
    /// The call this robot is currently engaged in (as finder or helper).
    pub(crate) call:     Option<CallId>,

    /// Ticks spent in the current protocol wait state.
    pub(crate) retry_ticks:  u32,
    /// Ticks spent waiting at the gold cell or the deposit.
    pub(crate) wait_ticks:   u32,
    /// Ticks spent issuing unresolved pickup intents.
    pub(crate) pickup_ticks: u32,

    pub(crate) directory: TeammateDirectory,
}

impl Robot {
    pub fn new(id: RobotId, team: Team, pos: Pos, facing: Direction, grid_size: u16) -> Self {
        Self {
            id,
            team,
            pos,
            facing,
            grid_size,
            phase: Phase::Exploring,
            holding: false,
            partner: None,
            target: None,
            call_seq: 0,
            call: None,
            retry_ticks: 0,
            wait_ticks: 0,
            pickup_ticks: 0,
            directory: TeammateDirectory::new(),
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> RobotId {
        self.id
    }

    #[inline]
    pub fn team(&self) -> Team {
        self.team
    }

    #[inline]
    pub fn pos(&self) -> Pos {
        self.pos
    }

    #[inline]
    pub fn facing(&self) -> Direction {
        self.facing
    }

    #[inline]
    pub fn holding(&self) -> bool {
        self.holding
    }

    #[inline]
    pub fn partner(&self) -> Option<RobotId> {
        self.partner
    }

    #[inline]
    pub fn target(&self) -> Option<Pos> {
        self.target
    }

    /// Coarse FSM phase, as seen by teammates and observers.
    #[inline]
    pub fn phase_tag(&self) -> PhaseTag {
        self.phase.tag()
    }

    /// Last-known teammate states (read-only).
    pub fn teammates(&self) -> &TeammateDirectory {
        &self.directory
    }

    // ── Driver-applied physical effects ───────────────────────────────────

    /// Apply a resolved movement action.  `Move` off the grid is a silent
    /// no-op; `Pickup` and `Idle` have no physical effect here (pickups are
    /// resolved by the driver against the grid).
    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::Move => {
                let next = self.pos.step(self.facing);
                let side = self.grid_size as i32;
                if (0..side).contains(&next.row) && (0..side).contains(&next.col) {
                    self.pos = next;
                }
            }
            Action::TurnLeft  => self.facing = self.facing.left(),
            Action::TurnRight => self.facing = self.facing.right(),
            Action::Pickup | Action::Idle => {}
        }
    }

    /// Driver confirmation that a joint pickup succeeded: start carrying
    /// with `partner`.  The driver calls this on both robots of the pair in
    /// the same resolution step.
    pub fn confirm_pickup(&mut self, partner: RobotId) {
        self.holding = true;
        self.partner = Some(partner);
        self.phase = Phase::Carrying;
        self.target = None;
        self.call = None;
        self.retry_ticks = 0;
        self.wait_ticks = 0;
        self.pickup_ticks = 0;
    }

    /// Driver-enforced drop: the pair diverged (or the partner state was
    /// inconsistent), the gold went back on the grid, start over.
    pub fn force_drop(&mut self) {
        self.holding = false;
        self.reset_to_exploring();
    }

    /// Driver confirmation that the pair deposited and scored.
    pub fn confirm_deposit(&mut self) {
        self.holding = false;
        self.reset_to_exploring();
    }

    // ── Internal ──────────────────────────────────────────────────────────

    /// Clear partner, target, call, and every timer; back to exploring.
    ///
    /// The teammate directory survives — it is a belief cache, not
    /// protocol state.
    pub(crate) fn reset_to_exploring(&mut self) {
        self.phase = Phase::Exploring;
        self.partner = None;
        self.target = None;
        self.call = None;
        self.retry_ticks = 0;
        self.wait_ticks = 0;
        self.pickup_ticks = 0;
    }
}
