//! Maze Runner - a terminal snake arcade game with an online leaderboard
//!
//! This library provides:
//! - Core game logic: toroidal grid, snake, food, session controller
//!   (game module)
//! - PostgreSQL-backed leaderboard with non-blocking background I/O
//!   (leaderboard module)
//! - Key event classification (input module)
//! - TUI rendering (render module)
//! - The application state machine and event loop (app module)

pub mod app;
pub mod game;
pub mod input;
pub mod leaderboard;
pub mod render;
