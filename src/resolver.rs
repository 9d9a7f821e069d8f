//! Tick resolution: one move per agent, applied in ascending ID order.
//!
//! Agents are resolved one after another against a single mutable grid, so
//! an agent's collision check sees every write made by lower IDs earlier in
//! the same tick. That ordering decides every tie-break below.

use std::fmt;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};
use crate::grid::{Cell, GridState, SegmentKind};
use crate::input::Moves;
use crate::snake::{AgentId, Position, Snake};

/// Why an agent died.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Moved off the grid.
    Wall,
    /// Ran into a body segment of `owner` (possibly itself).
    Body { owner: AgentId },
    /// Met the head of `other`, which had already moved this tick.
    HeadOn { other: AgentId },
    /// Ran into the head of a multi-segment agent that had not moved yet.
    Neck { owner: AgentId },
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wall => write!(f, "hit the wall"),
            Self::Body { owner } => write!(f, "hit the body of agent {owner}"),
            Self::HeadOn { other } => write!(f, "head-on with agent {other}"),
            Self::Neck { owner } => write!(f, "hit the neck of agent {owner}"),
        }
    }
}

/// One agent death recorded during a tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Death {
    pub uid: AgentId,
    pub cause: DeathCause,
}

/// Outcome of the movement phase of one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickResolution {
    pub food_eaten: usize,
    pub deaths: Vec<Death>,
}

enum Collision {
    Clear,
    Dies(DeathCause),
    BothDie { other: AgentId },
}

/// Applies one move per agent to `grid` and `snakes`.
///
/// `snakes[k]` must be the agent with ID `k + 1`, and `moves` must hold one
/// slot per agent plus the reserved slot 0. The arity is checked before
/// anything is mutated. Food is not replenished here.
pub fn resolve_tick(
    grid: &mut GridState,
    snakes: &mut [Snake],
    moves: &Moves,
) -> Result<TickResolution> {
    moves.check_arity(snakes.len())?;

    let mut resolution = TickResolution::default();
    // Head position each agent moved away from this tick.
    let mut origins: Vec<Option<Position>> = vec![None; snakes.len() + 1];

    for uid in 1..=snakes.len() {
        let index = uid - 1;
        if !snakes[index].is_alive() {
            continue;
        }
        let Some(direction) = moves.get(uid) else {
            trace!("agent {uid} holds position");
            continue;
        };

        let head = snakes[index].head()?;
        let target = head.step(direction);
        trace!("agent {uid} moves {direction:?} to {target:?}");

        let will_eat = grid.contains(target) && grid.cell_at(target)?.is_food();

        match check_collision(grid, snakes, uid, target, &origins)? {
            Collision::Clear => {
                let tail = snakes[index].tail()?;
                let uncovered = uncovered_cell(snakes, uid, tail);
                move_snake(grid, &mut snakes[index], target, will_eat, uncovered)?;
                origins[uid] = Some(head);
                if will_eat {
                    resolution.food_eaten += 1;
                }
            }
            Collision::Dies(cause) => {
                kill(grid, &mut snakes[index], cause, &mut resolution)?;
            }
            Collision::BothDie { other } => {
                kill(
                    grid,
                    &mut snakes[index],
                    DeathCause::HeadOn { other },
                    &mut resolution,
                )?;
                let partner = &mut snakes[other - 1];
                if partner.is_alive() {
                    kill(
                        grid,
                        partner,
                        DeathCause::HeadOn { other: uid },
                        &mut resolution,
                    )?;
                }
            }
        }
    }

    Ok(resolution)
}

fn check_collision(
    grid: &GridState,
    snakes: &[Snake],
    uid: AgentId,
    target: Position,
    origins: &[Option<Position>],
) -> Result<Collision> {
    if !grid.contains(target) {
        return Ok(Collision::Dies(DeathCause::Wall));
    }
    let target_cell = grid.cell_at(target)?;

    // A lower ID passed through this single-cell agent's head earlier in the
    // tick and left its old cell empty; moving into that cell is a swap.
    let head = snake_at(snakes, uid)?.head()?;
    if let Cell::Occupied {
        uid: other,
        kind: SegmentKind::Head,
    } = grid.cell_at(head)?
    {
        if other != uid
            && target_cell.is_empty()
            && origins.get(other).copied().flatten() == Some(target)
        {
            return Ok(Collision::BothDie { other });
        }
    }

    match target_cell {
        Cell::Empty | Cell::Food => Ok(Collision::Clear),
        Cell::Occupied {
            uid: owner,
            kind: SegmentKind::Body,
        } => {
            if owner < uid || target != snake_at(snakes, owner)?.tail()? {
                Ok(Collision::Dies(DeathCause::Body { owner }))
            } else {
                // Assumes the owner does not eat this tick, so its tail vacates.
                Ok(Collision::Clear)
            }
        }
        Cell::Occupied {
            uid: owner,
            kind: SegmentKind::Head,
        } => {
            if owner < uid {
                Ok(Collision::BothDie { other: owner })
            } else if snake_at(snakes, owner)?.len() > 1 {
                Ok(Collision::Dies(DeathCause::Neck { owner }))
            } else {
                // Single-segment agent that has not moved yet: pass through.
                Ok(Collision::Clear)
            }
        }
    }
}

/// `uncovered` is what the tail cell shows once this agent leaves it.
fn move_snake(
    grid: &mut GridState,
    snake: &mut Snake,
    target: Position,
    will_eat: bool,
    uncovered: Cell,
) -> Result<()> {
    let uid = snake.id();
    let old_head = snake.head()?;

    // Either cell may already carry the head of a lower ID that moved in
    // during this tick; that head must survive.
    if !will_eat {
        let tail = snake.tail()?;
        if grid.cell_at(tail)?.owner() == Some(uid) {
            grid.set_cell(tail, uncovered)?;
        }
        snake.pop_tail();
    }
    if !snake.is_empty() && !owned_by_other(grid.cell_at(old_head)?, uid) {
        grid.set_cell(old_head, Cell::body(uid))?;
    }

    snake.push_head(target);
    grid.set_cell(target, Cell::head(uid))
}

fn kill(
    grid: &mut GridState,
    snake: &mut Snake,
    cause: DeathCause,
    resolution: &mut TickResolution,
) -> Result<()> {
    let uid = snake.id();
    let head = snake.head()?;
    snake.kill();
    // A stale head must not read as a live head to later agents. The cell may
    // instead hold the head of a lower ID that passed through this tick.
    if grid.cell_at(head)? == Cell::head(uid) {
        grid.set_cell(head, Cell::body(uid))?;
    }
    debug!("agent {uid} died: {cause}");
    resolution.deaths.push(Death { uid, cause });
    Ok(())
}

/// Cell left behind when `uid` moves off `position`.
///
/// An agent that entered a stationary agent's tail, or passed through a
/// single-cell agent that held position, shares that cell until it moves on.
/// The other agent's marker comes back then, a live head first.
fn uncovered_cell(snakes: &[Snake], uid: AgentId, position: Position) -> Cell {
    let others = || snakes.iter().filter(move |snake| snake.id() != uid);
    if let Some(snake) = others()
        .find(|snake| snake.is_alive() && snake.head().ok() == Some(position))
    {
        return Cell::head(snake.id());
    }
    others()
        .find(|snake| snake.occupies(position))
        .map_or(Cell::Empty, |snake| Cell::body(snake.id()))
}

fn owned_by_other(cell: Cell, uid: AgentId) -> bool {
    cell.owner().is_some_and(|owner| owner != uid)
}

fn snake_at(snakes: &[Snake], uid: AgentId) -> Result<&Snake> {
    uid.checked_sub(1)
        .and_then(|index| snakes.get(index))
        .ok_or_else(|| ArenaError::InvalidState(format!("grid references unknown agent {uid}")))
}
