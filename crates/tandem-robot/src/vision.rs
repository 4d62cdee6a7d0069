//! The forward vision cone.
//!
//! A robot sees two rows ahead of its facing: three cells in the next row
//! (straight ahead plus one to each side) and five in the row after that.
//! It does **not** see the cell it stands on through the cone — standing-on
//! sensing is a separate check the FSM applies where it matters.
//!
//! ```text
//!         . x x x x x .        x = visible
//!         . . x x x . .        ^ = robot, facing up
//!         . . . ^ . . .
//! ```

use tandem_core::{Direction, Pos};

/// The eight cone cells for a robot at `pos` facing `facing`, nearest row
/// first.
///
/// Cells are *not* bounds-checked — off-grid positions simply read as
/// invalid (`None`) from the grid, so callers can filter by lookup.
pub fn visible_positions(pos: Pos, facing: Direction) -> [Pos; 8] {
    let (dr, dc) = facing.delta();
    let (pr, pc) = facing.perpendicular();

    let front = Pos::new(pos.row + dr, pos.col + dc);
    let front2 = Pos::new(front.row + dr, front.col + dc);

    [
        Pos::new(front.row - pr, front.col - pc),
        front,
        Pos::new(front.row + pr, front.col + pc),
        Pos::new(front2.row - 2 * pr, front2.col - 2 * pc),
        Pos::new(front2.row - pr, front2.col - pc),
        front2,
        Pos::new(front2.row + pr, front2.col + pc),
        Pos::new(front2.row + 2 * pr, front2.col + 2 * pc),
    ]
}
