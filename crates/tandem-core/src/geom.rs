//! Grid geometry: positions, facing directions, Manhattan metric.
//!
//! Positions are `(row, col)` pairs stored as `i32` so that off-grid
//! candidates (one step past an edge, flank cells of a border resource) are
//! representable; bounds checking is the grid's job, not the type's.

use std::fmt;

// ── Direction ─────────────────────────────────────────────────────────────────

/// A facing direction on the grid.
///
/// Row/col deltas follow the `(row, col)` convention: north decreases the
/// row, east increases the column.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All four directions, in clockwise order starting north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// `(row, col)` delta of one forward step.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East  => (0, 1),
            Direction::West  => (0, -1),
        }
    }

    /// Facing after a 90° counter-clockwise turn.
    #[inline]
    pub fn left(self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::West  => Direction::South,
            Direction::South => Direction::East,
            Direction::East  => Direction::North,
        }
    }

    /// Facing after a 90° clockwise turn.
    #[inline]
    pub fn right(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East  => Direction::South,
            Direction::South => Direction::West,
            Direction::West  => Direction::North,
        }
    }

    /// Number of clockwise quarter-turns from `self` to `to` (0–3).
    ///
    /// The counter-clockwise count is `(4 - clockwise) % 4`; steering uses
    /// whichever is shorter.
    pub fn quarter_turns_right(self, to: Direction) -> u8 {
        fn idx(d: Direction) -> u8 {
            match d {
                Direction::North => 0,
                Direction::East  => 1,
                Direction::South => 2,
                Direction::West  => 3,
            }
        }
        (idx(to) + 4 - idx(self)) % 4
    }

    /// Unit vectors perpendicular to this facing, used to widen the vision
    /// cone sideways.
    #[inline]
    pub fn perpendicular(self) -> (i32, i32) {
        match self {
            Direction::North | Direction::South => (0, 1),
            Direction::East | Direction::West   => (1, 0),
        }
    }

    /// Human-readable label, useful for CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::South => "S",
            Direction::East  => "E",
            Direction::West  => "W",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Pos ───────────────────────────────────────────────────────────────────────

/// A `(row, col)` grid coordinate.
///
/// `Ord` orders row-major, which keeps position-keyed `BTreeMap`s (and
/// therefore contention-resolution order) deterministic.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos {
    pub row: i32,
    pub col: i32,
}

impl Pos {
    #[inline]
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The cell one step in `dir` from here (not bounds-checked).
    #[inline]
    pub fn step(self, dir: Direction) -> Pos {
        let (dr, dc) = dir.delta();
        Pos::new(self.row + dr, self.col + dc)
    }

    /// The four orthogonally adjacent cells (not bounds-checked).
    pub fn neighbors(self) -> [Pos; 4] {
        [
            self.step(Direction::South),
            self.step(Direction::North),
            self.step(Direction::East),
            self.step(Direction::West),
        ]
    }

    /// Manhattan distance to `other`.
    #[inline]
    pub fn manhattan(self, other: Pos) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
