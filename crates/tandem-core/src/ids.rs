//! Strongly typed robot identifier.
//!
//! `RobotId` is `Copy + Ord + Hash` so it can be used as a map key and a
//! sorted-collection element without ceremony.  The inner integer is `pub`
//! to allow direct indexing into per-robot `Vec`s via `id.0 as usize`, but
//! callers should prefer the `.index()` helper for clarity.

use std::fmt;

/// Index of a robot in the simulation roster.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotId(pub u32);

impl RobotId {
    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RobotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

impl From<RobotId> for usize {
    #[inline(always)]
    fn from(id: RobotId) -> usize {
        id.0 as usize
    }
}

impl TryFrom<usize> for RobotId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<RobotId, Self::Error> {
        u32::try_from(n).map(RobotId)
    }
}
