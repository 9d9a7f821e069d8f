//! Grid storage and the cell encoding shared with hosts.
//!
//! Cells are kept as tagged values. The integer form only exists at the
//! boundary: `0` empty, `-1` food, `2 * uid` the head of agent `uid` and
//! `2 * uid - 1` one of its body segments.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::GridSize;
use crate::error::{ArenaError, Result};
use crate::snake::{AgentId, Position};

/// Raw value of an empty cell.
pub const EMPTY_CODE: i32 = 0;

/// Raw value of a food cell.
pub const FOOD_CODE: i32 = -1;

/// Which part of an agent occupies a cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    Head,
    Body,
}

/// Semantic content of one grid cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Food,
    Occupied { uid: AgentId, kind: SegmentKind },
}

impl Cell {
    #[must_use]
    pub fn head(uid: AgentId) -> Self {
        Self::Occupied {
            uid,
            kind: SegmentKind::Head,
        }
    }

    #[must_use]
    pub fn body(uid: AgentId) -> Self {
        Self::Occupied {
            uid,
            kind: SegmentKind::Body,
        }
    }

    /// Decodes a raw cell value. Values below `-1` are never written and read as empty.
    #[must_use]
    pub fn decode(value: i32) -> Self {
        match value {
            FOOD_CODE => Self::Food,
            v if v <= EMPTY_CODE => Self::Empty,
            v => {
                // ceil(v / 2)
                let uid = (v / 2 + v % 2) as AgentId;
                let kind = if v % 2 == 0 {
                    SegmentKind::Head
                } else {
                    SegmentKind::Body
                };
                Self::Occupied { uid, kind }
            }
        }
    }

    /// Encodes to the raw cell value.
    #[must_use]
    pub fn encode(self) -> i32 {
        match self {
            Self::Empty => EMPTY_CODE,
            Self::Food => FOOD_CODE,
            Self::Occupied { uid, kind } => {
                let doubled = 2 * uid as i32;
                match kind {
                    SegmentKind::Head => doubled,
                    SegmentKind::Body => doubled - 1,
                }
            }
        }
    }

    /// Owner of the cell, if an agent occupies it.
    #[must_use]
    pub fn owner(self) -> Option<AgentId> {
        match self {
            Self::Occupied { uid, .. } => Some(uid),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }

    #[must_use]
    pub fn is_food(self) -> bool {
        self == Self::Food
    }
}

/// Fixed-size grid of cells, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    size: GridSize,
    cells: Vec<Cell>,
}

impl GridState {
    /// Creates an all-empty grid.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size.total_cells()],
        }
    }

    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    #[must_use]
    pub fn rows(&self) -> u16 {
        self.size.rows
    }

    #[must_use]
    pub fn cols(&self) -> u16 {
        self.size.cols
    }

    /// Returns true when `position` lies inside the grid.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.is_within_bounds(self.size)
    }

    /// Reads the cell at `position`.
    pub fn cell_at(&self, position: Position) -> Result<Cell> {
        let index = self.index_of(position)?;
        Ok(self.cells[index])
    }

    /// Writes the cell at `position`. No encoding consistency is checked.
    pub fn set_cell(&mut self, position: Position, cell: Cell) -> Result<()> {
        let index = self.index_of(position)?;
        self.cells[index] = cell;
        Ok(())
    }

    /// Iterates every position with its cell, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        let cols = usize::from(self.size.cols);
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let position = Position::new((index / cols) as i32, (index % cols) as i32);
            (position, *cell)
        })
    }

    /// Collects all empty positions, row by row.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<Position> {
        self.iter()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(position, _)| position)
            .collect()
    }

    #[must_use]
    pub fn count_food(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_food()).count()
    }

    #[must_use]
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_empty()).count()
    }

    /// Fraction of cells that are not empty.
    #[must_use]
    pub fn occupied_fraction(&self) -> f64 {
        if self.cells.is_empty() {
            return 1.0;
        }
        let occupied = self.cells.len() - self.count_empty();
        occupied as f64 / self.cells.len() as f64
    }

    /// Copies the grid out in the raw integer encoding.
    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        let cols = usize::from(self.size.cols).max(1);
        let cells = self
            .cells
            .chunks(cols)
            .map(|row| row.iter().map(|cell| cell.encode()).collect())
            .collect();
        GridSnapshot { cells }
    }

    fn index_of(&self, position: Position) -> Result<usize> {
        if !self.contains(position) {
            return Err(ArenaError::OutOfBounds {
                row: position.row,
                col: position.col,
                rows: self.size.rows,
                cols: self.size.cols,
            });
        }
        Ok(position.row as usize * usize::from(self.size.cols) + position.col as usize)
    }
}

/// Row-major copy of the grid in the raw integer encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub cells: Vec<Vec<i32>>,
}

impl GridSnapshot {
    /// Raw value at `position`, if inside the snapshot.
    #[must_use]
    pub fn raw_at(&self, position: Position) -> Option<i32> {
        let row = usize::try_from(position.row).ok()?;
        let col = usize::try_from(position.col).ok()?;
        self.cells.get(row)?.get(col).copied()
    }

    /// Decoded cell at `position`, if inside the snapshot.
    #[must_use]
    pub fn cell_at(&self, position: Position) -> Option<Cell> {
        self.raw_at(position).map(Cell::decode)
    }

    #[must_use]
    pub fn count_food(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&value| value == FOOD_CODE)
            .count()
    }
}

impl fmt::Display for GridSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .cells
            .iter()
            .flatten()
            .map(|value| value.to_string().len())
            .max()
            .unwrap_or(1);

        for row in &self.cells {
            let line = row
                .iter()
                .map(|value| format!("{value:>width$}"))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
