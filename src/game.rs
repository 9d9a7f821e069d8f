use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::{GridSize, SessionConfig};
use crate::error::{ArenaError, Result};
use crate::food::{random_empty_cell, spawn_food};
use crate::grid::{Cell, GridSnapshot, GridState, SegmentKind};
use crate::input::Moves;
use crate::resolver::{Death, resolve_tick};
use crate::snake::{AgentId, Position, Snake, SnakeStatus};

/// Everything a host needs after one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub grid: GridSnapshot,
    /// Status of every agent in ID order; `statuses[0]` is agent 1.
    pub statuses: Vec<SnakeStatus>,
    pub deaths: Vec<Death>,
    pub food_eaten: usize,
    pub food_spawned: usize,
}

impl TickReport {
    /// Status of agent `uid`, if it exists.
    #[must_use]
    pub fn status(&self, uid: AgentId) -> Option<SnakeStatus> {
        uid.checked_sub(1)
            .and_then(|index| self.statuses.get(index))
            .copied()
    }

    /// Host wire form: indexed by agent ID, slot 0 reserved, `1` alive, `0` dead.
    #[must_use]
    pub fn status_flags(&self) -> Vec<u8> {
        std::iter::once(0)
            .chain(self.statuses.iter().map(|status| status.flag()))
            .collect()
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.statuses
            .iter()
            .filter(|status| **status == SnakeStatus::Alive)
            .count()
    }
}

/// One simulation session: grid, agents and the random source.
#[derive(Debug, Clone)]
pub struct Arena<R = StdRng> {
    grid: GridState,
    snakes: Vec<Snake>,
    config: SessionConfig,
    tick_count: u64,
    rng: R,
}

impl Arena<StdRng> {
    /// Creates a deterministic session for tests and reproducible simulations.
    pub fn with_seed(config: SessionConfig, seed: u64) -> Result<Self> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Arena<R> {
    /// Places `num_agents` single-cell agents, then `num_food` food items,
    /// each on a distinct random empty cell.
    pub fn new(config: SessionConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        warn_unimplemented_options(&config);

        let mut grid = GridState::new(config.grid_size);
        let mut snakes = Vec::with_capacity(config.num_agents);
        for uid in 1..=config.num_agents {
            let start = random_empty_cell(&mut rng, &grid).ok_or_else(|| {
                ArenaError::InvalidState(format!("no empty cell left to place agent {uid}"))
            })?;
            grid.set_cell(start, Cell::head(uid))?;
            snakes.push(Snake::new(uid, start));
        }

        let placed = spawn_food(&mut rng, &mut grid, config.num_food)?;
        if placed < config.num_food {
            return Err(ArenaError::InvalidState(format!(
                "placed {placed} of {} initial food",
                config.num_food
            )));
        }

        info!(
            "arena ready: {} agents, {} food on a {}x{} grid",
            config.num_agents, config.num_food, config.grid_size.rows, config.grid_size.cols
        );

        Ok(Self {
            grid,
            snakes,
            config,
            tick_count: 0,
            rng,
        })
    }

    /// Builds a session from explicit agent bodies (head first) and food cells.
    ///
    /// `bodies[k]` becomes agent `k + 1`. The agent count in `config` is taken
    /// from `bodies` and the food count from `food`.
    pub fn from_parts(
        mut config: SessionConfig,
        bodies: Vec<Vec<Position>>,
        food: Vec<Position>,
        rng: R,
    ) -> Result<Self> {
        config.num_agents = bodies.len();
        config.num_food = food.len();
        config.validate()?;
        warn_unimplemented_options(&config);

        let mut grid = GridState::new(config.grid_size);
        let mut snakes = Vec::with_capacity(bodies.len());
        for (index, body) in bodies.into_iter().enumerate() {
            let uid = index + 1;
            if body.is_empty() {
                return Err(ArenaError::InvalidState(format!(
                    "agent {uid} has an empty body"
                )));
            }
            for (segment, position) in body.iter().enumerate() {
                let cell = if segment == 0 {
                    Cell::head(uid)
                } else {
                    Cell::body(uid)
                };
                claim(&mut grid, *position, cell)?;
            }
            snakes.push(Snake::from_segments(uid, body));
        }
        for position in food {
            claim(&mut grid, position, Cell::Food)?;
        }

        Ok(Self {
            grid,
            snakes,
            config,
            tick_count: 0,
            rng,
        })
    }

    /// Advances the simulation by one tick.
    ///
    /// Fails with `ArityMismatch`, without touching any state, unless `moves`
    /// has one slot per agent plus the reserved slot 0.
    pub fn step(&mut self, moves: &Moves) -> Result<TickReport> {
        let resolution = resolve_tick(&mut self.grid, &mut self.snakes, moves)?;
        self.tick_count += 1;

        let occupancy = self.grid.occupied_fraction();
        if resolution.food_eaten > 0 && occupancy > self.config.occupancy_warn_threshold {
            warn!(
                "tick {}: grid is {:.0}% occupied, food respawn may be slow",
                self.tick_count,
                occupancy * 100.0
            );
        }
        let food_spawned = spawn_food(&mut self.rng, &mut self.grid, resolution.food_eaten)?;

        let report = TickReport {
            tick: self.tick_count,
            grid: self.grid.snapshot(),
            statuses: self.statuses(),
            deaths: resolution.deaths,
            food_eaten: resolution.food_eaten,
            food_spawned,
        };
        debug!(
            "tick {}: {} alive, {} died, {} food eaten",
            report.tick,
            report.alive_count(),
            report.deaths.len(),
            report.food_eaten
        );
        Ok(report)
    }

    /// A move set with one empty slot per agent.
    #[must_use]
    pub fn empty_moves(&self) -> Moves {
        Moves::new(self.snakes.len())
    }

    #[must_use]
    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    #[must_use]
    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    /// Agent `uid`, if it exists.
    #[must_use]
    pub fn snake(&self, uid: AgentId) -> Option<&Snake> {
        uid.checked_sub(1).and_then(|index| self.snakes.get(index))
    }

    #[must_use]
    pub fn num_agents(&self) -> usize {
        self.snakes.len()
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.snakes.iter().filter(|snake| snake.is_alive()).count()
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.grid.size()
    }

    /// Whether dead-body-to-food conversion was requested. Stored only; dead
    /// bodies are never converted.
    #[must_use]
    pub fn dead_to_food(&self) -> bool {
        self.config.dead_to_food
    }

    /// Status of every agent in ID order.
    #[must_use]
    pub fn statuses(&self) -> Vec<SnakeStatus> {
        self.snakes.iter().map(Snake::status).collect()
    }

    /// Mutable access to the random source, for drivers sharing it.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Checks that every live agent's head cell carries its head encoding and
    /// that no other cell claims to be that agent's head.
    ///
    /// A head cell may instead show another agent that currently shares it,
    /// such as a lower ID that passed through an agent holding position. The
    /// agent then has no head cell until the other one moves on.
    pub fn check_invariants(&self) -> Result<()> {
        let mut heads = vec![0_usize; self.snakes.len() + 1];
        for (position, cell) in self.grid.iter() {
            if let Cell::Occupied { uid, kind } = cell {
                if uid == 0 || uid > self.snakes.len() {
                    return Err(ArenaError::InvalidState(format!(
                        "cell {position:?} references unknown agent {uid}"
                    )));
                }
                if kind == SegmentKind::Head {
                    heads[uid] += 1;
                }
            }
        }

        for snake in self.snakes.iter().filter(|snake| snake.is_alive()) {
            let uid = snake.id();
            let head = snake.head()?;
            let cell = self.grid.cell_at(head)?;
            let marked = cell == Cell::head(uid);
            if !marked && !cell.owner().is_some_and(|owner| owner != uid) {
                return Err(ArenaError::InvalidState(format!(
                    "agent {uid} head {head:?} is not marked on the grid"
                )));
            }
            if heads[uid] != usize::from(marked) {
                return Err(ArenaError::InvalidState(format!(
                    "agent {uid} has {} head cells",
                    heads[uid]
                )));
            }
        }
        Ok(())
    }
}

fn claim(grid: &mut GridState, position: Position, cell: Cell) -> Result<()> {
    if !grid.cell_at(position)?.is_empty() {
        return Err(ArenaError::InvalidState(format!(
            "cell {position:?} is claimed twice"
        )));
    }
    grid.set_cell(position, cell)
}

fn warn_unimplemented_options(config: &SessionConfig) {
    if config.dead_to_food {
        warn!("dead_to_food is not implemented; dead bodies stay on the grid");
    }
}
