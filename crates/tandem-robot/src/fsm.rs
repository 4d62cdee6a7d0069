//! The per-tick FSM step: observation, phase logic, steering, timeouts.

use tandem_comms::{CallId, Envelope, Message};
use tandem_core::{Direction, PhaseTag, Pos, RobotRng, Tick};
use tandem_grid::Grid;

use crate::decision::{Action, Decision, RobotEvent};
use crate::robot::{Phase, Robot};
use crate::vision::visible_positions;

// ── Tuning constants ──────────────────────────────────────────────────────────

/// Ticks a protocol wait state lasts before re-sending or reverting.
pub const PROTOCOL_RETRY_TICKS: u32 = 15;
/// Ticks spent waiting for the partner at the gold cell before giving up.
pub const WAIT_AT_GOLD_TICKS: u32 = 30;
/// Ticks of unresolved pickup intents before giving up (guards against
/// crowding-induced starvation).
pub const PICKUP_WAIT_TICKS: u32 = 5;
/// Ticks spent at the deposit waiting for the partner before giving up.
pub const DEPOSIT_WAIT_TICKS: u32 = 20;
/// Chance per exploring tick to turn instead of stepping forward.
pub const TURN_PROBABILITY: f64 = 0.2;

impl Robot {
    /// Run one tick of this robot: observe the grid through the vision
    /// cone, consume the inbox, advance the FSM, and emit the tick's
    /// physical intent plus outbound messages.
    ///
    /// The grid reference is the start-of-tick snapshot; nothing here
    /// mutates shared state.  The returned action is an *intent* — the
    /// driver resolves contention before it takes effect.
    pub fn step(
        &mut self,
        now:   Tick,
        grid:  &Grid,
        inbox: Vec<Envelope>,
        rng:   &mut RobotRng,
    ) -> Decision {
        let mut decision = Decision::default();

        let observed = self.observe(grid);
        self.process_messages(inbox, now, &mut decision.outbox);
        let action = self.decide(grid, &observed, rng, &mut decision);
        decision.action = action;

        // Always let teammates know where we are and what we're up to.
        decision.outbox.push(Envelope::to_team(
            self.id,
            self.team,
            Message::StateUpdate {
                pos:     self.pos,
                phase:   self.phase.tag(),
                holding: self.holding,
            },
        ));

        decision
    }

    /// Gold cells currently inside the vision cone, nearest first.
    fn observe(&self, grid: &Grid) -> Vec<Pos> {
        visible_positions(self.pos, self.facing)
            .into_iter()
            .filter(|&p| grid.gold_at(p).unwrap_or(0) > 0)
            .collect()
    }

    /// `true` if `cell` is the robot's own cell or inside its cone.
    fn sees(&self, cell: Pos) -> bool {
        cell == self.pos || visible_positions(self.pos, self.facing).contains(&cell)
    }

    // ── Phase logic ───────────────────────────────────────────────────────

    fn decide(
        &mut self,
        grid:     &Grid,
        observed: &[Pos],
        rng:      &mut RobotRng,
        out:      &mut Decision,
    ) -> Action {
        match self.phase {
            // ── Carrying: head for the deposit in lockstep ────────────────
            Phase::Carrying => {
                let deposit = grid.deposit(self.team);
                if self.pos == deposit {
                    self.phase = Phase::AtDeposit;
                    self.wait_ticks = 0;
                    Action::Idle
                } else {
                    self.steer_towards(deposit)
                }
            }

            // ── At the deposit, waiting for the driver's confirmation ─────
            //
            // While holding, this robot's fate belongs to the driver: the
            // coherence pass breaks the pair if the partner strays, and the
            // deposit pass confirms the score.  A local reset here would
            // split the pair one-sidedly.  The timeout only recovers from a
            // stale empty-handed phase.
            Phase::AtDeposit => {
                self.wait_ticks += 1;
                if !self.holding && self.wait_ticks > DEPOSIT_WAIT_TICKS {
                    self.give_up(out);
                }
                Action::Idle
            }

            // ── Both believed present: keep issuing pickup intents ────────
            Phase::ReadyToPickup => {
                self.pickup_ticks += 1;
                if self.pickup_ticks > PICKUP_WAIT_TICKS {
                    self.give_up(out);
                    return Action::Idle;
                }
                Action::Pickup
            }

            // ── At the gold cell, waiting for the partner ─────────────────
            Phase::WaitingAtTarget => {
                // The partner check runs on cached broadcasts; under delay
                // it lags reality, which is why `ReadyToPickup` has its own
                // short timeout.
                let partner_here = self
                    .partner
                    .and_then(|p| self.directory.get(p))
                    .is_some_and(|info| {
                        info.pos == self.pos
                            && matches!(
                                info.phase,
                                PhaseTag::WaitingAtTarget | PhaseTag::ReadyToPickup
                            )
                    });
                if partner_here {
                    self.phase = Phase::ReadyToPickup;
                    self.pickup_ticks = 0;
                    return Action::Idle;
                }

                if grid.gold_at(self.pos) == Some(0) {
                    out.events.push(RobotEvent::GoldVanished { pos: self.pos });
                    self.reset_to_exploring();
                    return Action::Idle;
                }

                self.wait_ticks += 1;
                if self.wait_ticks > WAIT_AT_GOLD_TICKS {
                    self.give_up(out);
                }
                Action::Idle
            }

            // ── Converging on the committed gold cell ─────────────────────
            Phase::MovingToTarget => {
                let Some(target) = self.target else {
                    self.reset_to_exploring();
                    return Action::Idle;
                };
                if self.pos == target {
                    self.phase = Phase::WaitingAtTarget;
                    self.wait_ticks = 0;
                    return Action::Idle;
                }
                if self.sees(target) && grid.gold_at(target) == Some(0) {
                    out.events.push(RobotEvent::GoldVanished { pos: target });
                    self.reset_to_exploring();
                    return Action::Idle;
                }
                self.steer_towards(target)
            }

            // ── Finder: collecting offers ─────────────────────────────────
            Phase::FinderAwaitOffer => {
                if let Some(target) = self.target {
                    if self.sees(target) && grid.gold_at(target) == Some(0) {
                        out.events.push(RobotEvent::GoldVanished { pos: target });
                        self.reset_to_exploring();
                        return Action::Idle;
                    }
                }
                self.retry_ticks += 1;
                if self.retry_ticks > PROTOCOL_RETRY_TICKS {
                    // Nobody answered yet — repeat the same call.
                    self.send_found(out);
                    self.retry_ticks = 0;
                }
                Action::Idle
            }

            // ── Finder: helper recruited, waiting for its arrival ─────────
            Phase::FinderAwaitArrival => {
                self.retry_ticks += 1;
                if self.retry_ticks > PROTOCOL_RETRY_TICKS {
                    self.give_up(out);
                }
                Action::Idle
            }

            // ── Finder: helper in position, converge and signal ───────────
            Phase::FinderConverge => {
                let (Some(target), Some(helper), Some(call)) =
                    (self.target, self.partner, self.call)
                else {
                    self.reset_to_exploring();
                    return Action::Idle;
                };
                if self.pos == target {
                    out.outbox.push(Envelope::to_robot(
                        self.id,
                        helper,
                        Message::Proceed { call },
                    ));
                    self.phase = Phase::MovingToTarget;
                    return Action::Idle;
                }
                let action = self.steer_towards(target);
                if action == Action::Move {
                    // Signal on the first forward step; turning first would
                    // send the helper in while we are still rotating.
                    out.outbox.push(Envelope::to_robot(
                        self.id,
                        helper,
                        Message::Proceed { call },
                    ));
                    self.phase = Phase::MovingToTarget;
                }
                action
            }

            // ── Helper: offered, waiting for the verdict ──────────────────
            Phase::HelperAwaitAccept { .. } => {
                self.retry_ticks += 1;
                if self.retry_ticks > PROTOCOL_RETRY_TICKS {
                    self.give_up(out);
                }
                Action::Idle
            }

            // ── Helper: recruited, moving to the far side ─────────────────
            Phase::HelperFlank { flank } => {
                if self.pos == flank {
                    let (Some(finder), Some(call)) = (self.partner, self.call) else {
                        self.reset_to_exploring();
                        return Action::Idle;
                    };
                    out.outbox.push(Envelope::to_robot(
                        self.id,
                        finder,
                        Message::Arrived { call, helper: self.id },
                    ));
                    self.phase = Phase::HelperAwaitProceed;
                    self.retry_ticks = 0;
                    return Action::Idle;
                }
                self.steer_towards(flank)
            }

            // ── Helper: in position, waiting for the go-signal ────────────
            Phase::HelperAwaitProceed => {
                self.retry_ticks += 1;
                if self.retry_ticks > PROTOCOL_RETRY_TICKS {
                    self.give_up(out);
                }
                Action::Idle
            }

            // ── Exploring: random walk until gold shows up ────────────────
            Phase::Exploring => {
                if let Some(&gold_pos) = observed.first() {
                    self.call_seq += 1;
                    let call = CallId { finder: self.id, seq: self.call_seq };
                    self.call = Some(call);
                    self.target = Some(gold_pos);
                    self.phase = Phase::FinderAwaitOffer;
                    self.retry_ticks = 0;
                    self.send_found(out);
                    out.events.push(RobotEvent::CallOpened { call, gold_pos });
                    return Action::Idle;
                }

                if rng.gen_bool(TURN_PROBABILITY) {
                    if rng.gen_bool(0.5) {
                        Action::TurnLeft
                    } else {
                        Action::TurnRight
                    }
                } else {
                    Action::Move
                }
            }
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    /// Timeout path: report it and revert to exploring.
    fn give_up(&mut self, out: &mut Decision) {
        out.events.push(RobotEvent::TimedOut { phase: self.phase.tag() });
        self.reset_to_exploring();
    }

    /// (Re-)broadcast the current call.  No-op if the robot is not a
    /// finder with an open call.
    fn send_found(&self, out: &mut Decision) {
        let (Some(call), Some(gold_pos)) = (self.call, self.target) else {
            return;
        };
        out.outbox.push(Envelope::to_team(
            self.id,
            self.team,
            Message::Found { call, gold_pos, finder_pos: self.pos },
        ));
    }

    /// Greedy steering: close the larger axis delta first; turn toward the
    /// desired facing via the shorter rotation (ties turn left), else step
    /// forward.
    pub(crate) fn steer_towards(&self, target: Pos) -> Action {
        let dr = target.row - self.pos.row;
        let dc = target.col - self.pos.col;

        let desired = if dr.abs() > dc.abs() {
            if dr > 0 { Direction::South } else { Direction::North }
        } else if dc > 0 {
            Direction::East
        } else {
            Direction::West
        };

        if self.facing == desired {
            return Action::Move;
        }
        let right = self.facing.quarter_turns_right(desired);
        let left = (4 - right) % 4;
        if left <= right {
            Action::TurnLeft
        } else {
            Action::TurnRight
        }
    }
}
