//! Per-team tallies and the end-of-run summary.

use tandem_core::Team;

// ── Scoreboard ────────────────────────────────────────────────────────────────

/// Cumulative per-team counters, indexed by [`Team::index`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    scores:  [u32; 2],
    pickups: [u32; 2],
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gold units a team has deposited.
    #[inline]
    pub fn score(&self, team: Team) -> u32 {
        self.scores[team.index()]
    }

    /// Successful joint pickups a team has made (including gold later
    /// dropped on the way).
    #[inline]
    pub fn pickups(&self, team: Team) -> u32 {
        self.pickups[team.index()]
    }

    /// Gold units removed from the world across both teams.
    #[inline]
    pub fn total_deposited(&self) -> u32 {
        self.scores.iter().sum()
    }

    pub(crate) fn record_pickup(&mut self, team: Team) {
        self.pickups[team.index()] += 1;
    }

    pub(crate) fn record_score(&mut self, team: Team) {
        self.scores[team.index()] += 1;
    }
}

// ── RunSummary ────────────────────────────────────────────────────────────────

/// Everything worth reporting once a run ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks actually executed (≤ the configured budget).
    pub ticks_run: u64,
    /// Gold on the field at tick zero.
    pub initial_gold: u32,
    /// `true` if the run ended because every unit was deposited.
    pub all_collected: bool,
    /// Final per-team scores, indexed by [`Team::index`].
    pub scores: [u32; 2],
    /// Final per-team pickup counts, indexed by [`Team::index`].
    pub pickups: [u32; 2],
}

impl RunSummary {
    /// The team with the strictly higher score, or `None` on a tie.
    pub fn winner(&self) -> Option<Team> {
        use std::cmp::Ordering;
        match self.scores[0].cmp(&self.scores[1]) {
            Ordering::Greater => Some(Team::Red),
            Ordering::Less    => Some(Team::Blue),
            Ordering::Equal   => None,
        }
    }
}
