//! Per-tick simulation engine for multi-agent grid Snake.
//!
//! An [`Arena`] owns a [`GridState`] and a set of [`Snake`]s. Each call to
//! [`Arena::step`] applies one move per agent in ascending ID order, replaces
//! eaten food and returns a [`TickReport`].

pub mod config;
pub mod error;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod resolver;
pub mod snake;

pub use config::{GridSize, SessionConfig};
pub use error::{ArenaError, Result};
pub use game::{Arena, TickReport};
pub use grid::{Cell, GridSnapshot, GridState, SegmentKind};
pub use input::{Direction, Moves};
pub use resolver::{Death, DeathCause};
pub use snake::{AgentId, Position, Snake, SnakeStatus};
