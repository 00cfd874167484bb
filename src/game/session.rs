use std::time::Instant;

use rand::rngs::ThreadRng;
use tracing::{debug, info};

use super::config::{Difficulty, GameConfig};
use super::direction::Direction;
use super::food::Food;
use super::grid::Grid;
use super::snake::Snake;

/// Input relevant to a running session, one event per pending key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionInput {
    Direction(Direction),
    PauseToggle,
    Escape,
    Quit,
}

/// Terminal outcome of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// User pressed escape; return to the menu
    Menu,
    /// User closed the app; quit entirely
    QuitApp,
    /// Lives exhausted
    GameOver,
}

/// One play session: snake, food, lives, score, pause state.
///
/// The owner drives it with `handle_input` for each pending input event
/// and `tick` once per simulation tick; either may report a terminal
/// outcome, after which the session should be discarded.
pub struct Session {
    pub snake: Snake,
    pub food: Food,
    pub lives: u32,
    pub difficulty: Difficulty,
    pub paused: bool,
    grid: Grid,
    started_at: Instant,
    rng: ThreadRng,
}

impl Session {
    pub fn new(config: GameConfig, difficulty: Difficulty) -> Self {
        let grid = Grid::new(config.grid_width, config.grid_height);
        let snake = Snake::new(grid, config.initial_snake_length);
        let mut rng = rand::thread_rng();
        let food = Food::spawn(&mut rng, grid, &snake.body);

        info!(%difficulty, "session started");

        Self {
            snake,
            food,
            lives: config.starting_lives,
            difficulty,
            paused: false,
            grid,
            started_at: Instant::now(),
            rng,
        }
    }

    /// Process one pending input event. While paused, everything except
    /// pause/escape/quit is ignored.
    pub fn handle_input(&mut self, input: SessionInput) -> Option<SessionOutcome> {
        match input {
            SessionInput::Escape => return Some(SessionOutcome::Menu),
            SessionInput::Quit => return Some(SessionOutcome::QuitApp),
            SessionInput::PauseToggle => self.paused = !self.paused,
            SessionInput::Direction(dir) => {
                if !self.paused {
                    self.snake.turn(dir);
                }
            }
        }
        None
    }

    /// Advance the simulation by one tick
    pub fn tick(&mut self) -> Option<SessionOutcome> {
        if self.paused || self.snake.direction.is_none() {
            return None;
        }

        let alive = self.snake.advance(self.grid);
        if !alive {
            self.lives -= 1;
            debug!(lives = self.lives, score = self.snake.score, "life lost");
            if self.lives == 0 {
                info!(score = self.snake.score, "game over");
                return Some(SessionOutcome::GameOver);
            }
            self.snake.reset_position(self.grid);
            return None;
        }

        if self.snake.head() == self.food.cell {
            self.snake.grow();
            self.food.randomize(&mut self.rng, self.grid, &self.snake.body);
            debug!(
                score = self.snake.score,
                length = self.snake.length,
                "food eaten"
            );
        }

        None
    }

    pub fn score(&self) -> u32 {
        self.snake.score
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Session play time as mm:ss for the HUD
    pub fn format_elapsed(&self) -> String {
        let total_secs = self.started_at.elapsed().as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid::Cell;

    fn session() -> Session {
        Session::new(GameConfig::default(), Difficulty::Medium)
    }

    #[test]
    fn test_initial_state() {
        let session = session();
        assert_eq!(session.lives, 3);
        assert_eq!(session.score(), 0);
        assert!(!session.paused);
        assert!(!session.snake.occupies(session.food.cell));
    }

    #[test]
    fn test_idle_tick_is_noop() {
        let mut session = session();
        let body = session.snake.body.clone();
        assert_eq!(session.tick(), None);
        assert_eq!(session.snake.body, body);
    }

    #[test]
    fn test_direction_input_turns_snake() {
        let mut session = session();
        assert_eq!(
            session.handle_input(SessionInput::Direction(Direction::East)),
            None
        );
        assert_eq!(session.snake.direction, Some(Direction::East));
    }

    #[test]
    fn test_pause_blocks_movement_and_turns() {
        let mut session = session();
        session.handle_input(SessionInput::Direction(Direction::East));
        session.handle_input(SessionInput::PauseToggle);
        assert!(session.paused);

        let body = session.snake.body.clone();
        assert_eq!(session.tick(), None);
        assert_eq!(session.snake.body, body);

        session.handle_input(SessionInput::Direction(Direction::North));
        assert_eq!(session.snake.direction, Some(Direction::East));

        session.handle_input(SessionInput::PauseToggle);
        assert!(!session.paused);
        session.tick();
        assert_ne!(session.snake.body, body);
    }

    #[test]
    fn test_escape_and_quit_outcomes() {
        let mut session = session();
        assert_eq!(
            session.handle_input(SessionInput::Escape),
            Some(SessionOutcome::Menu)
        );
        assert_eq!(
            session.handle_input(SessionInput::Quit),
            Some(SessionOutcome::QuitApp)
        );
    }

    #[test]
    fn test_eating_food_grows_and_respawns() {
        let mut session = session();
        session.handle_input(SessionInput::Direction(Direction::East));
        // Place the food directly in front of the head.
        let target = session.grid().step(session.snake.head(), Direction::East);
        session.food.cell = target;

        assert_eq!(session.tick(), None);
        assert_eq!(session.score(), 10);
        assert_eq!(session.snake.length, 4);
        assert_ne!(session.food.cell, target);
        assert!(!session.snake.occupies(session.food.cell));
    }

    #[test]
    fn test_fatal_collision_consumes_life_and_resets() {
        let mut session = session();
        // Hand-craft a body where moving north lands on body index 2.
        session.snake.body = vec![Cell::new(5, 5), Cell::new(4, 5), Cell::new(5, 4)];
        session.snake.length = 3;
        session.snake.direction = Some(Direction::North);

        assert_eq!(session.tick(), None);
        assert_eq!(session.lives, 2);
        assert_eq!(session.snake.body, vec![Cell::new(10, 10)]);
        assert_eq!(session.snake.direction, None);
    }

    #[test]
    fn test_game_over_at_zero_lives() {
        let mut session = session();
        session.lives = 1;
        session.snake.body = vec![Cell::new(5, 5), Cell::new(4, 5), Cell::new(5, 4)];
        session.snake.length = 3;
        session.snake.direction = Some(Direction::North);

        assert_eq!(session.tick(), Some(SessionOutcome::GameOver));
    }

    #[test]
    fn test_score_survives_lost_life() {
        let mut session = session();
        session.snake.score = 30;
        session.snake.body = vec![Cell::new(5, 5), Cell::new(4, 5), Cell::new(5, 4)];
        session.snake.length = 3;
        session.snake.direction = Some(Direction::North);

        session.tick();
        assert_eq!(session.score(), 30);
    }
}
