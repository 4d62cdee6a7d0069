//! Finder–helper message handling.
//!
//! All inbox consumption lives here: one exhaustive match over the message
//! vocabulary.  The rules for every variant are the same three checks —
//! right phase, right call, right robot — and anything that fails them is
//! stale by definition and dropped silently.  Under random delay that is
//! the normal case, not an exception: offers arrive after a helper was
//! recruited, accepts arrive after the volunteer gave up, retries arrive
//! twice.

use tandem_comms::{Envelope, Message};
use tandem_core::{Pos, Tick};

use crate::directory::TeammateState;
use crate::robot::{Phase, Robot};

impl Robot {
    /// Consume this tick's inbox, updating the teammate directory and
    /// advancing the handshake.  Replies are pushed onto `outbox`.
    pub(crate) fn process_messages(
        &mut self,
        inbox:  Vec<Envelope>,
        now:    Tick,
        outbox: &mut Vec<Envelope>,
    ) {
        for env in inbox {
            match env.msg {
                // ── Teammate directory upkeep ─────────────────────────────
                Message::StateUpdate { pos, phase, holding } => {
                    self.directory.record(
                        env.from,
                        TeammateState { pos, phase, holding, last_seen: now },
                    );
                }

                // ── A finder is calling for help ──────────────────────────
                //
                // Only an idle explorer volunteers; everyone else lets the
                // broadcast pass.
                Message::Found { call, gold_pos, finder_pos } => {
                    if self.phase == Phase::Exploring {
                        outbox.push(Envelope::to_robot(
                            self.id,
                            call.finder,
                            Message::Offer { call, helper: self.id },
                        ));
                        self.phase = Phase::HelperAwaitAccept { finder_pos };
                        self.call = Some(call);
                        self.target = Some(gold_pos);
                        self.retry_ticks = 0;
                    }
                }

                // ── A volunteer answered our call ─────────────────────────
                //
                // First matching offer wins; later ones find us already in
                // `FinderAwaitArrival` and fall through.
                Message::Offer { call, helper } => {
                    if self.phase == Phase::FinderAwaitOffer && self.call == Some(call) {
                        self.partner = Some(helper);
                        outbox.push(Envelope::to_team(
                            self.id,
                            self.team,
                            Message::Accept { call, helper },
                        ));
                        self.phase = Phase::FinderAwaitArrival;
                        self.retry_ticks = 0;
                    }
                }

                // ── The finder picked a helper ────────────────────────────
                //
                // Broadcast so that losing volunteers learn immediately
                // instead of waiting out their timer.
                Message::Accept { call, helper } => {
                    if let Phase::HelperAwaitAccept { finder_pos } = self.phase {
                        if self.call != Some(call) {
                            continue;
                        }
                        if helper == self.id {
                            // Recruited: commit to the pair and head for
                            // the far side of the gold.
                            self.partner = Some(call.finder);
                            let flank = self.flank_position(finder_pos);
                            self.phase = Phase::HelperFlank { flank };
                            self.retry_ticks = 0;
                        } else {
                            // Someone else got the job.
                            self.reset_to_exploring();
                        }
                    }
                }

                // ── Our helper is in position ─────────────────────────────
                Message::Arrived { call, helper } => {
                    if self.phase == Phase::FinderAwaitArrival
                        && self.call == Some(call)
                        && self.partner == Some(helper)
                    {
                        self.phase = Phase::FinderConverge;
                        self.retry_ticks = 0;
                    }
                }

                // ── The finder says: converge ─────────────────────────────
                Message::Proceed { call } => {
                    if self.phase == Phase::HelperAwaitProceed && self.call == Some(call) {
                        self.phase = Phase::MovingToTarget;
                        self.retry_ticks = 0;
                    }
                }
            }
        }
    }

    /// The helper's rendezvous cell: the in-bounds cell adjacent to the
    /// target gold that lies farthest from the finder (so the pair closes
    /// in from opposite sides), ties broken by closeness to this helper.
    pub(crate) fn flank_position(&self, finder_pos: Pos) -> Pos {
        let Some(gold) = self.target else {
            return self.pos;
        };
        let side = self.grid_size as i32;
        let in_bounds = |p: Pos| (0..side).contains(&p.row) && (0..side).contains(&p.col);

        let mut best: Option<(Pos, u32, u32)> = None;
        for cand in gold.neighbors() {
            if !in_bounds(cand) {
                continue;
            }
            let from_finder = cand.manhattan(finder_pos);
            let from_self = cand.manhattan(self.pos);
            let better = match best {
                None => true,
                Some((_, bf, bs)) => {
                    from_finder > bf || (from_finder == bf && from_self < bs)
                }
            };
            if better {
                best = Some((cand, from_finder, from_self));
            }
        }
        best.map(|(p, _, _)| p).unwrap_or(gold)
    }
}
