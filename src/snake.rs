use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::GridSize;
use crate::error::{ArenaError, Result};
use crate::input::Direction;

/// 1-based agent identifier, stable for the session.
pub type AgentId = usize;

/// Grid position in (row, column) cell coordinates.
///
/// Signed so that a step off the edge is still representable.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    #[must_use]
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.row >= 0
            && self.col >= 0
            && self.row < i32::from(bounds.rows)
            && self.col < i32::from(bounds.cols)
    }

    /// Returns the neighbouring position one cell towards `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self { row, col }
    }
}

/// Alive/dead status of an agent. `Dead` is terminal.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SnakeStatus {
    Alive,
    Dead,
}

impl SnakeStatus {
    /// Host wire flag: `1` alive, `0` dead.
    #[must_use]
    pub fn flag(self) -> u8 {
        match self {
            Self::Alive => 1,
            Self::Dead => 0,
        }
    }
}

/// One participant: an ordered body (front is head) and a status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    id: AgentId,
    status: SnakeStatus,
    body: VecDeque<Position>,
}

impl Snake {
    /// Creates a one-cell snake at `start`.
    #[must_use]
    pub fn new(id: AgentId, start: Position) -> Self {
        let mut body = VecDeque::new();
        body.push_front(start);

        Self {
            id,
            status: SnakeStatus::Alive,
            body,
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    #[must_use]
    pub fn from_segments(id: AgentId, segments: Vec<Position>) -> Self {
        Self {
            id,
            status: SnakeStatus::Alive,
            body: VecDeque::from(segments),
        }
    }

    #[must_use]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[must_use]
    pub fn status(&self) -> SnakeStatus {
        self.status
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.status == SnakeStatus::Alive
    }

    /// Returns the current head position.
    pub fn head(&self) -> Result<Position> {
        self.body.front().copied().ok_or_else(|| self.empty_body())
    }

    /// Returns the current tail position.
    pub fn tail(&self) -> Result<Position> {
        self.body.back().copied().ok_or_else(|| self.empty_body())
    }

    /// Marks the snake dead. Idempotent; the body is left as it was.
    pub fn kill(&mut self) {
        self.status = SnakeStatus::Dead;
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    /// Drops the tail segment, returning it.
    pub(crate) fn pop_tail(&mut self) -> Option<Position> {
        self.body.pop_back()
    }

    /// Pushes a new head segment.
    pub(crate) fn push_head(&mut self, head: Position) {
        self.body.push_front(head);
    }

    fn empty_body(&self) -> ArenaError {
        ArenaError::InvalidState(format!("agent {} has an empty body", self.id))
    }
}
