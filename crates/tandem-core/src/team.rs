//! The two competing teams.

/// One of the two teams sharing the grid.
///
/// Each team has a fixed deposit corner (resolved by `tandem-grid`) and a
/// home half of the grid where its robots start.  Messages never cross team
/// boundaries.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Team {
    /// Deposits at the top-left corner.
    Red,
    /// Deposits at the bottom-right corner.
    Blue,
}

impl Team {
    /// Both teams, in scoreboard index order.
    pub const ALL: [Team; 2] = [Team::Red, Team::Blue];

    /// The opposing team.
    #[inline]
    pub fn rival(self) -> Team {
        match self {
            Team::Red  => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    /// Scoreboard index: `Red = 0`, `Blue = 1`.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Team::Red  => 0,
            Team::Blue => 1,
        }
    }

    /// Human-readable label, useful for CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            Team::Red  => "red",
            Team::Blue => "blue",
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
