use std::io;

use thiserror::Error;

/// Errors surfaced by the arena engine.
#[derive(Debug, Error)]
pub enum ArenaError {
    /// The move set does not carry one slot per participant (plus the reserved slot 0).
    #[error("expected {expected} move slots (including reserved slot 0), got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// Direct grid access outside `[0, rows) x [0, cols)`.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: i32,
        col: i32,
        rows: u16,
        cols: u16,
    },

    /// Internal consistency failure between agents and the grid.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A wire move code outside `-1..=3`.
    #[error("invalid move code {0}")]
    InvalidMove(i8),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read configuration: {0}")]
    ConfigIo(#[from] io::Error),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ArenaError>;
