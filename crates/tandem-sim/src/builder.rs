//! Fluent builder for constructing a [`Sim`].

use tandem_comms::MessageBus;
use tandem_core::{Direction, Pos, RobotId, RobotRng, SimConfig, SimRng, Team, Tick};
use tandem_grid::Grid;
use tandem_robot::Robot;

use crate::{Scoreboard, Sim, SimError, SimResult};

/// Explicit starting pose for one robot, for callers that lay out the
/// roster by hand (scenario tests, replays).  Auto-generated rosters don't
/// need this.
#[derive(Copy, Clone, Debug)]
pub struct RobotSpec {
    pub team:   Team,
    pub pos:    Pos,
    pub facing: Direction,
}

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`] — grid size, gold count, team size, budget, seed, delays
///
/// # Optional inputs (have defaults)
///
/// | Method        | Default                                               |
/// |---------------|-------------------------------------------------------|
/// | `.grid(g)`    | Generated: `gold_count` units scattered by the seed   |
/// | `.robots(v)`  | `team_size` robots per team, random pose in each      |
/// |               | team's home half of the grid                          |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config).build()?;
/// let summary = sim.run(&mut NoopObserver);
/// ```
pub struct SimBuilder {
    config: SimConfig,
    grid:   Option<Grid>,
    robots: Option<Vec<RobotSpec>>,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self { config, grid: None, robots: None }
    }

    /// Supply a pre-built grid instead of generating one.
    ///
    /// Its side length must match `config.grid_size`; its gold layout
    /// overrides `config.gold_count`.
    pub fn grid(mut self, grid: Grid) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Supply explicit robot poses instead of random placement.
    ///
    /// The list defines the whole roster (ids are assigned in order), so it
    /// may differ from `config.team_size` — scenario tests often field just
    /// one pair.
    pub fn robots(mut self, specs: Vec<RobotSpec>) -> Self {
        self.robots = Some(specs);
        self
    }

    /// Validate inputs, place gold and robots, and return a ready-to-run
    /// [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        let config = self.config;

        // ── Validate configuration ────────────────────────────────────────
        if config.grid_size < 2 {
            return Err(SimError::Config(format!(
                "grid size {} cannot hold two deposit cells",
                config.grid_size
            )));
        }
        let (min, max) = config.message_delay_ticks;
        if min > max {
            return Err(SimError::Config(format!(
                "message delay range ({min}, {max}) has min > max"
            )));
        }
        if self.robots.is_none() && config.team_size < 2 {
            return Err(SimError::Config(format!(
                "team size {} can never complete a joint pickup",
                config.team_size
            )));
        }

        let mut rng = SimRng::new(config.seed);

        // ── Grid: supplied or generated ───────────────────────────────────
        let grid = match self.grid {
            Some(grid) => {
                if grid.size() != config.grid_size {
                    return Err(SimError::Config(format!(
                        "supplied grid is {0}x{0} but config says {1}x{1}",
                        grid.size(),
                        config.grid_size
                    )));
                }
                grid
            }
            None => Grid::generate(config.grid_size, config.gold_count, &mut rng)?,
        };

        // ── Roster: supplied or placed in home halves ─────────────────────
        let specs = match self.robots {
            Some(specs) => {
                for (i, spec) in specs.iter().enumerate() {
                    if !grid.in_bounds(spec.pos) {
                        return Err(SimError::Config(format!(
                            "robot {i} starts off-grid at {}",
                            spec.pos
                        )));
                    }
                }
                specs
            }
            None => Self::home_region_roster(&config, &mut rng),
        };

        let robots: Vec<Robot> = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                Robot::new(RobotId(i as u32), spec.team, spec.pos, spec.facing, config.grid_size)
            })
            .collect();
        let rngs: Vec<RobotRng> = (0..robots.len() as u32)
            .map(|i| RobotRng::new(config.seed, RobotId(i)))
            .collect();
        let inboxes = vec![Vec::new(); robots.len()];

        // The bus gets its own RNG stream so delay draws never perturb
        // placement draws.
        let bus = MessageBus::new(config.message_delay_ticks.into(), rng.child(1));

        let initial_gold = grid.total_gold();
        Ok(Sim {
            config,
            tick: Tick::ZERO,
            grid,
            robots,
            rngs,
            inboxes,
            bus,
            scoreboard: Scoreboard::new(),
            initial_gold,
        })
    }

    /// Random pose for every robot, each team confined to the half of the
    /// rows nearest its own deposit.
    fn home_region_roster(config: &SimConfig, rng: &mut SimRng) -> Vec<RobotSpec> {
        let size = config.grid_size as i32;
        let half = size / 2;
        let mut specs = Vec::with_capacity(config.robot_count());
        for team in Team::ALL {
            let rows = match team {
                Team::Red  => 0..half,
                Team::Blue => size - half..size,
            };
            for _ in 0..config.team_size {
                let pos = Pos::new(rng.gen_range(rows.clone()), rng.gen_range(0..size));
                let facing = rng
                    .choose(&Direction::ALL)
                    .copied()
                    .unwrap_or(Direction::North);
                specs.push(RobotSpec { team, pos, facing });
            }
        }
        specs
    }
}
