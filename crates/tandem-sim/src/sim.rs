//! The `Sim` struct and its tick loop.

use std::collections::BTreeMap;
use std::mem;

use tandem_comms::{Address, Envelope, MessageBus};
use tandem_core::{PhaseTag, Pos, RobotRng, SimConfig, Team, Tick};
use tandem_grid::Grid;
use tandem_robot::{Action, Robot};

use crate::observer::{DropReason, SimEvent, SimObserver, TickStats};
use crate::scoreboard::{RunSummary, Scoreboard};

/// The main simulation runner.
///
/// Holds the whole world — grid, roster, bus, tallies — and drives the
/// seven-phase tick loop documented at the [crate root](crate).  Create via
/// [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (budget, seed, delays, …).
    pub config: SimConfig,

    /// The next tick to execute.
    pub tick: Tick,

    /// The shared field.  Written only during contention resolution, never
    /// by robots.
    pub grid: Grid,

    /// The roster, indexed by `RobotId`.
    pub robots: Vec<Robot>,

    /// Per-robot deterministic RNGs, parallel to `robots`.
    pub rngs: Vec<RobotRng>,

    /// Per-robot inboxes, parallel to `robots`.  Filled during delivery,
    /// drained by each robot's step.
    pub(crate) inboxes: Vec<Vec<Envelope>>,

    /// The delayed-delivery message substrate.
    pub bus: MessageBus,

    /// Cumulative per-team scores and pickup counts.
    pub scoreboard: Scoreboard,

    /// Gold on the field at tick zero; the conservation baseline and the
    /// early-termination threshold.
    pub initial_gold: u32,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick until the budget is exhausted or every
    /// gold unit has been deposited, whichever comes first.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> RunSummary {
        loop {
            let now = self.tick;
            if now >= self.config.end_tick() || self.all_collected() {
                break;
            }
            self.process_tick(now, observer);
            self.tick = now + 1;
        }
        let summary = self.summary();
        observer.on_run_end(&summary);
        summary
    }

    /// Run exactly `n` ticks from the current position, ignoring the
    /// budget and the early-termination check.
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            let now = self.tick;
            self.process_tick(now, observer);
            self.tick = now + 1;
        }
    }

    /// `true` once both teams together have deposited the initial gold.
    pub fn all_collected(&self) -> bool {
        self.scoreboard.total_deposited() >= self.initial_gold
    }

    /// Gold units currently carried by pairs (each pair carries one).
    pub fn carried_gold(&self) -> u32 {
        self.robots.iter().filter(|r| r.holding()).count() as u32 / 2
    }

    /// Snapshot of the final (or current) tallies.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks_run:     self.tick.0,
            initial_gold:  self.initial_gold,
            all_collected: self.all_collected(),
            scores:  [
                self.scoreboard.score(Team::Red),
                self.scoreboard.score(Team::Blue),
            ],
            pickups: [
                self.scoreboard.pickups(Team::Red),
                self.scoreboard.pickups(Team::Blue),
            ],
        }
    }

    // ── Core tick processing ──────────────────────────────────────────────

    pub(crate) fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) {
        observer.on_tick_start(now);

        // ── Phase 1: deliver due messages ─────────────────────────────────
        let due = self.bus.deliver_due(now);
        let delivered = self.route_delivered(due);

        // ── Phase 2: decide ───────────────────────────────────────────────
        //
        // Ascending id, reading only the start-of-tick grid: the grid is
        // not touched until resolution below, so every robot decides
        // against the same consistent snapshot no matter its index.
        let robot_count = self.robots.len();
        let mut actions = vec![Action::Idle; robot_count];
        let mut staged: Vec<Envelope> = Vec::new();

        // Explicit field borrows so the borrow checker sees disjoint access.
        let grid = &self.grid;
        for i in 0..robot_count {
            let inbox = mem::take(&mut self.inboxes[i]);
            let decision = self.robots[i].step(now, grid, inbox, &mut self.rngs[i]);
            actions[i] = decision.action;
            for event in decision.events {
                observer.on_event(
                    now,
                    &SimEvent::Protocol { robot: self.robots[i].id(), event },
                );
            }
            staged.extend(decision.outbox);
        }

        // ── Phase 3: pickup contention ────────────────────────────────────
        self.resolve_pickups(&actions, now, observer);

        // ── Phase 4: movement ─────────────────────────────────────────────
        //
        // Pre-move positions are kept for the coherence phase: a diverging
        // pair drops its gold at the last cell it shared.
        let prev: Vec<Pos> = self.robots.iter().map(|r| r.pos()).collect();
        for (i, &action) in actions.iter().enumerate() {
            self.robots[i].apply_action(action);
        }

        // ── Phase 5: carry-pair coherence ─────────────────────────────────
        self.resolve_carrying(&prev, now, observer);

        // ── Phase 6: deposits ─────────────────────────────────────────────
        self.resolve_deposits(now, observer);

        // ── Phase 7: hand staged envelopes to the bus ─────────────────────
        let sent = staged.len();
        for env in staged {
            self.bus.send(env, now);
        }

        observer.on_tick_end(
            now,
            &TickStats { delivered, sent, pending: self.bus.pending_count() },
        );

        if self.config.snapshot_interval_ticks > 0
            && now.0.is_multiple_of(self.config.snapshot_interval_ticks)
        {
            observer.on_snapshot(now, &self.grid, &self.robots, &self.scoreboard);
        }
    }

    /// Route delivered envelopes into inboxes, fanning team broadcasts out
    /// to every same-team robot except the sender.  Returns the number of
    /// inbox insertions.
    fn route_delivered(&mut self, envelopes: Vec<Envelope>) -> usize {
        let mut delivered = 0;
        for env in envelopes {
            match env.to {
                Address::Robot(id) => {
                    if id.index() < self.robots.len() {
                        self.inboxes[id.index()].push(env);
                        delivered += 1;
                    }
                }
                Address::Team(team) => {
                    for i in 0..self.robots.len() {
                        if self.robots[i].team() == team && self.robots[i].id() != env.from {
                            self.inboxes[i].push(env.clone());
                            delivered += 1;
                        }
                    }
                }
            }
        }
        delivered
    }

    // ── Contention resolution ─────────────────────────────────────────────

    /// Group pickup intents by (cell, team) and apply the joint-pickup
    /// rules: exactly two same-team robots on a cell with gold succeed;
    /// a cross-team race on a single unit fails both; with two or more
    /// units both teams may lift in the same tick.
    pub(crate) fn resolve_pickups<O: SimObserver>(
        &mut self,
        actions:  &[Action],
        now:      Tick,
        observer: &mut O,
    ) {
        // BTreeMap: cells resolve in row-major order, so event order is
        // reproducible for a given seed.
        let mut attempts: BTreeMap<Pos, [Vec<usize>; 2]> = BTreeMap::new();
        for (i, robot) in self.robots.iter().enumerate() {
            if actions[i] == Action::Pickup && !robot.holding() {
                attempts.entry(robot.pos()).or_default()[robot.team().index()].push(i);
            }
        }

        for (pos, groups) in attempts {
            let contested = groups[0].len() == 2 && groups[1].len() == 2;
            if contested && self.grid.gold_at(pos) == Some(1) {
                observer.on_event(now, &SimEvent::PickupConflict { pos });
                continue;
            }

            for team in Team::ALL {
                let group = &groups[team.index()];
                if group.len() != 2 {
                    // One robot can't lift; three or more jostle and fail.
                    continue;
                }
                if self.grid.gold_at(pos).unwrap_or(0) == 0 {
                    continue;
                }
                self.grid.take_gold(pos);

                let (a, b) = (group[0], group[1]);
                let (id_a, id_b) = (self.robots[a].id(), self.robots[b].id());
                self.robots[a].confirm_pickup(id_b);
                self.robots[b].confirm_pickup(id_a);
                self.scoreboard.record_pickup(team);
                observer.on_event(now, &SimEvent::Pickup { team, pos, pair: [id_a, id_b] });
            }
        }
    }

    /// Enforce the carrying invariant: every holding robot has a partner
    /// that also holds, shares its cell, and points back at it.  Any
    /// violation drops the pair's gold at the detecting robot's pre-move
    /// cell and resets both robots in the same step.
    pub(crate) fn resolve_carrying<O: SimObserver>(
        &mut self,
        prev:     &[Pos],
        now:      Tick,
        observer: &mut O,
    ) {
        let n = self.robots.len();
        for i in 0..n {
            if !self.robots[i].holding() {
                continue;
            }
            let violation = match self.robots[i].partner() {
                None => Some(DropReason::PartnerMissing),
                Some(p) if p.index() >= n => Some(DropReason::PartnerMissing),
                Some(p) => {
                    let q = &self.robots[p.index()];
                    if !q.holding() {
                        Some(DropReason::PartnerNotHolding)
                    } else if q.pos() != self.robots[i].pos() {
                        Some(DropReason::Separated)
                    } else if q.partner() != Some(self.robots[i].id()) {
                        Some(DropReason::Asymmetric)
                    } else {
                        None
                    }
                }
            };
            let Some(reason) = violation else { continue };

            let drop_pos = prev[i];
            self.grid.add_gold(drop_pos);

            let robot_id = self.robots[i].id();
            let partner = self.robots[i].partner();
            self.robots[i].force_drop();
            if let Some(p) = partner {
                if p.index() < n {
                    self.robots[p.index()].force_drop();
                }
            }
            observer.on_event(now, &SimEvent::Drop { pos: drop_pos, robot: robot_id, reason });
        }
    }

    /// Score every holding pair co-present at its team's deposit and reset
    /// both robots.
    pub(crate) fn resolve_deposits<O: SimObserver>(&mut self, now: Tick, observer: &mut O) {
        let n = self.robots.len();
        for i in 0..n {
            let (team, pos, id) = {
                let r = &self.robots[i];
                if r.phase_tag() != PhaseTag::AtDeposit || !r.holding() {
                    continue;
                }
                (r.team(), r.pos(), r.id())
            };
            if pos != self.grid.deposit(team) {
                continue;
            }
            let Some(p) = self.robots[i].partner() else {
                continue;
            };
            if p.index() >= n {
                continue;
            }
            let partner_present = {
                let q = &self.robots[p.index()];
                q.pos() == pos && q.holding()
            };
            if !partner_present {
                continue;
            }

            let partner_id = self.robots[p.index()].id();
            self.robots[i].confirm_deposit();
            self.robots[p.index()].confirm_deposit();
            self.scoreboard.record_score(team);
            observer.on_event(now, &SimEvent::Deposit { team, pair: [id, partner_id] });
        }
    }
}
