use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};
use crate::snake::AgentId;

/// Wire code for a move slot that carries no direction.
pub const MOVE_CODE_UNDEFINED: i8 = -1;

/// Canonical movement directions, in wire-code order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions in wire-code order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Row/column delta for one step in this direction.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Right => (0, 1),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
        }
    }

    /// Wire code: `0` up, `1` right, `2` down, `3` left.
    #[must_use]
    pub fn code(self) -> i8 {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }

    /// Decodes a wire code. `-1` is an empty slot.
    pub fn from_code(code: i8) -> Result<Option<Self>> {
        match code {
            MOVE_CODE_UNDEFINED => Ok(None),
            0 => Ok(Some(Self::Up)),
            1 => Ok(Some(Self::Right)),
            2 => Ok(Some(Self::Down)),
            3 => Ok(Some(Self::Left)),
            other => Err(ArenaError::InvalidMove(other)),
        }
    }
}

/// One move slot per agent, indexed by agent ID.
///
/// Slot 0 is reserved so that `slots[uid]` lines up with the 1-based agent
/// numbering. An empty slot means the agent holds position this tick.
#[derive(Debug, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
pub struct Moves {
    slots: Vec<Option<Direction>>,
}

impl Moves {
    /// Creates an all-empty move set for `num_agents` participants.
    #[must_use]
    pub fn new(num_agents: usize) -> Self {
        Self {
            slots: vec![None; num_agents + 1],
        }
    }

    /// Wraps raw slots as-is; the arity is checked when the set is applied.
    #[must_use]
    pub fn from_slots(slots: Vec<Option<Direction>>) -> Self {
        Self { slots }
    }

    /// Decodes host wire codes (slot 0 included).
    pub fn from_codes(codes: &[i8]) -> Result<Self> {
        let slots = codes
            .iter()
            .map(|&code| Direction::from_code(code))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { slots })
    }

    /// Sets the move for `uid`, growing the set if needed.
    pub fn set(&mut self, uid: AgentId, direction: Direction) {
        if uid >= self.slots.len() {
            self.slots.resize(uid + 1, None);
        }
        self.slots[uid] = Some(direction);
    }

    /// Builder form of [`Moves::set`].
    #[must_use]
    pub fn with(mut self, uid: AgentId, direction: Direction) -> Self {
        self.set(uid, direction);
        self
    }

    /// Returns the move for `uid`, if any.
    #[must_use]
    pub fn get(&self, uid: AgentId) -> Option<Direction> {
        self.slots.get(uid).copied().flatten()
    }

    /// Number of slots, including the reserved slot 0.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Fails with `ArityMismatch` unless there is exactly one slot per agent plus slot 0.
    pub fn check_arity(&self, num_agents: usize) -> Result<()> {
        let expected = num_agents + 1;
        if self.slots.len() != expected {
            return Err(ArenaError::ArityMismatch {
                expected,
                actual: self.slots.len(),
            });
        }
        Ok(())
    }
}
