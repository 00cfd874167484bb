//! Core game logic module
//!
//! Entity simulation (snake, food, toroidal grid) and the per-tick
//! session controller, with no I/O or rendering dependencies.

pub mod config;
pub mod direction;
pub mod food;
pub mod grid;
pub mod session;
pub mod snake;

// Re-export commonly used types
pub use config::{Difficulty, GameConfig};
pub use direction::Direction;
pub use food::Food;
pub use grid::{Cell, Grid};
pub use session::{Session, SessionInput, SessionOutcome};
pub use snake::Snake;
