//! The gold field and deposit table.

use tandem_core::{Pos, SimRng, TandemError, TandemResult, Team};

/// A bounded `size × size` field of gold counts with one deposit cell per
/// team at opposite corners.
///
/// All position-taking methods are bounds-checked: out-of-bounds reads
/// return `None` (an explicit "invalid" marker) and out-of-bounds writes
/// return `false`.  Nothing here panics on a bad position.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    size:     u16,
    /// Row-major gold counts.  A cell may stack more than one unit when a
    /// carrying pair drops onto an already-golden cell.
    cells:    Vec<u16>,
    /// Deposit cells indexed by `Team::index()`.  Held apart from `cells`
    /// so deposit identity never aliases a gold count.
    deposits: [Pos; 2],
}

impl Grid {
    /// An empty field (no gold) of the given side length.
    pub fn empty(size: u16) -> Self {
        let n = size as usize * size as usize;
        Self {
            size,
            cells: vec![0; n],
            deposits: [
                Pos::new(0, 0),
                Pos::new(size as i32 - 1, size as i32 - 1),
            ],
        }
    }

    /// Build a field with `gold_count` units scattered uniformly at random
    /// over free, non-deposit cells — one unit per cell, retrying until the
    /// full count is placed.
    ///
    /// Fails if the field cannot hold that much gold.
    pub fn generate(size: u16, gold_count: u32, rng: &mut SimRng) -> TandemResult<Self> {
        if size < 2 {
            return Err(TandemError::Config(format!(
                "grid size {size} cannot hold two deposit cells"
            )));
        }
        let mut grid = Grid::empty(size);
        let free_cells = size as u64 * size as u64 - 2;
        if gold_count as u64 > free_cells {
            return Err(TandemError::Config(format!(
                "cannot place {gold_count} gold on a {size}x{size} grid ({free_cells} free cells)"
            )));
        }
        grid.scatter(gold_count, rng);
        Ok(grid)
    }

    /// Scatter `count` additional gold units on free, non-deposit cells.
    ///
    /// Caller guarantees enough free cells exist (see [`Grid::generate`]).
    pub fn scatter(&mut self, count: u32, rng: &mut SimRng) {
        let mut placed = 0;
        while placed < count {
            let pos = Pos::new(
                rng.gen_range(0..self.size as i32),
                rng.gen_range(0..self.size as i32),
            );
            if self.is_deposit(pos) || self.gold_at(pos) != Some(0) {
                continue;
            }
            self.add_gold(pos);
            placed += 1;
        }
    }

    // ── Geometry ──────────────────────────────────────────────────────────

    /// Side length of the field.
    #[inline]
    pub fn size(&self) -> u16 {
        self.size
    }

    /// `true` if `pos` lies on the field.
    #[inline]
    pub fn in_bounds(&self, pos: Pos) -> bool {
        (0..self.size as i32).contains(&pos.row) && (0..self.size as i32).contains(&pos.col)
    }

    /// The deposit cell for `team`.
    #[inline]
    pub fn deposit(&self, team: Team) -> Pos {
        self.deposits[team.index()]
    }

    /// `true` if `pos` is either team's deposit cell.
    #[inline]
    pub fn is_deposit(&self, pos: Pos) -> bool {
        self.deposits.contains(&pos)
    }

    // ── Gold accounting ───────────────────────────────────────────────────

    /// Gold units at `pos`, or `None` out of bounds.
    #[inline]
    pub fn gold_at(&self, pos: Pos) -> Option<u16> {
        self.in_bounds(pos).then(|| self.cells[self.index(pos)])
    }

    /// Put one gold unit on `pos`.  Returns `false` (and changes nothing)
    /// out of bounds.
    pub fn add_gold(&mut self, pos: Pos) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        let i = self.index(pos);
        self.cells[i] += 1;
        true
    }

    /// Remove one gold unit from `pos`.  Returns `false` (and changes
    /// nothing) if `pos` is out of bounds or empty.
    pub fn take_gold(&mut self, pos: Pos) -> bool {
        if self.gold_at(pos).unwrap_or(0) == 0 {
            return false;
        }
        let i = self.index(pos);
        self.cells[i] -= 1;
        true
    }

    /// Total gold currently on the field.
    pub fn total_gold(&self) -> u32 {
        self.cells.iter().map(|&c| c as u32).sum()
    }

    #[inline]
    fn index(&self, pos: Pos) -> usize {
        pos.row as usize * self.size as usize + pos.col as usize
    }
}
