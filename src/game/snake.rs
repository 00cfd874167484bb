use super::direction::Direction;
use super::grid::{Cell, Grid};

/// The snake in the game
///
/// The body is stored head-first. A freshly spawned snake stores a single
/// cell at the grid center; the stored body grows toward `length` as the
/// snake moves, since the tail is only dropped once the stored cells would
/// exceed the logical length.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body cells, head at index 0
    pub body: Vec<Cell>,
    /// Current direction; `None` means idle (stationary at spawn)
    pub direction: Option<Direction>,
    /// Logical length the body grows toward
    pub length: usize,
    /// Points earned by this snake; survives a position reset
    pub score: u32,
}

impl Snake {
    /// Spawn a snake at the center of the grid, idle, with the given
    /// logical length
    pub fn new(grid: Grid, length: usize) -> Self {
        Self {
            body: vec![grid.center()],
            direction: None,
            length,
            score: 0,
        }
    }

    /// Get the head cell
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Request a direction change.
    ///
    /// Rejected as a no-op when the snake is longer than one segment and
    /// the request is the exact inverse of the current direction, which
    /// would be an instant self-collision by reversal. Everything else is
    /// accepted unconditionally; the grid wraps, so there are no bounds
    /// to validate against.
    pub fn turn(&mut self, requested: Direction) {
        if self.length > 1 && self.direction == Some(requested.opposite()) {
            return;
        }
        self.direction = Some(requested);
    }

    /// Advance one cell in the current direction. Returns `false` on
    /// self-collision, leaving the body unchanged; `true` otherwise.
    ///
    /// Idle snakes do not move. The collision check skips body indices 0
    /// and 1: during a straight move the new head is adjacent to, but
    /// distinct from, the former second segment, and including index 1
    /// would falsely flag legitimate forward movement.
    pub fn advance(&mut self, grid: Grid) -> bool {
        let Some(direction) = self.direction else {
            return true;
        };

        let new_head = grid.step(self.head(), direction);

        if self.body.len() > 2 && self.body[2..].contains(&new_head) {
            return false;
        }

        self.body.insert(0, new_head);
        if self.body.len() > self.length {
            self.body.pop();
        }
        true
    }

    /// Eat one food: logical length +1, score +10. The caller respawns
    /// the food.
    pub fn grow(&mut self) {
        self.length += 1;
        self.score += 10;
    }

    /// Reinitialize to a single center cell, length 3, idle — used after
    /// a non-fatal collision. The score is kept.
    pub fn reset_position(&mut self, grid: Grid) {
        self.body = vec![grid.center()];
        self.direction = None;
        self.length = 3;
    }

    /// Check whether a cell is occupied by any body segment
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(20, 20)
    }

    /// Build a snake with an explicit body, head first
    fn snake_with_body(body: &[Cell], direction: Direction) -> Snake {
        Snake {
            body: body.to_vec(),
            direction: Some(direction),
            length: body.len(),
            score: 0,
        }
    }

    #[test]
    fn test_spawn_is_idle_at_center() {
        let snake = Snake::new(grid(), 3);
        assert_eq!(snake.body, vec![Cell::new(10, 10)]);
        assert_eq!(snake.direction, None);
        assert_eq!(snake.length, 3);
    }

    #[test]
    fn test_idle_snake_does_not_move() {
        let mut snake = Snake::new(grid(), 3);
        assert!(snake.advance(grid()));
        assert_eq!(snake.body, vec![Cell::new(10, 10)]);
    }

    #[test]
    fn test_turn_from_idle() {
        let mut snake = Snake::new(grid(), 3);
        snake.turn(Direction::East);
        assert_eq!(snake.direction, Some(Direction::East));
    }

    #[test]
    fn test_turn_rejects_reversal() {
        let mut snake = Snake::new(grid(), 3);
        snake.turn(Direction::East);
        snake.turn(Direction::West);
        assert_eq!(snake.direction, Some(Direction::East));
    }

    #[test]
    fn test_turn_allows_reversal_when_length_one() {
        let mut snake = Snake::new(grid(), 1);
        snake.turn(Direction::East);
        snake.turn(Direction::West);
        assert_eq!(snake.direction, Some(Direction::West));
    }

    #[test]
    fn test_turn_accepts_perpendicular_and_same() {
        let mut snake = Snake::new(grid(), 3);
        snake.turn(Direction::East);
        snake.turn(Direction::North);
        assert_eq!(snake.direction, Some(Direction::North));
        snake.turn(Direction::North);
        assert_eq!(snake.direction, Some(Direction::North));
    }

    #[test]
    fn test_body_grows_toward_length_then_caps() {
        let mut snake = Snake::new(grid(), 3);
        snake.turn(Direction::East);

        assert!(snake.advance(grid()));
        assert_eq!(snake.body.len(), 2);
        assert!(snake.advance(grid()));
        assert_eq!(snake.body.len(), 3);
        assert!(snake.advance(grid()));
        assert_eq!(snake.body.len(), 3);
    }

    #[test]
    fn test_three_moves_east_with_wraparound() {
        // Length-3 snake centered on 20x20: three eastward moves shift the
        // whole body one unit east each tick.
        let mut snake = Snake::new(grid(), 3);
        snake.turn(Direction::East);
        for _ in 0..3 {
            assert!(snake.advance(grid()));
        }
        assert_eq!(
            snake.body,
            vec![Cell::new(13, 10), Cell::new(12, 10), Cell::new(11, 10)]
        );

        // Keep going past column 19 and reenter at 0
        for _ in 0..7 {
            assert!(snake.advance(grid()));
        }
        assert_eq!(snake.head(), Cell::new(0, 10));
    }

    #[test]
    fn test_collision_exempts_index_one() {
        // Stepping onto body[1] survives; stepping onto body[2] dies.
        let mut snake = snake_with_body(
            &[Cell::new(5, 5), Cell::new(6, 5), Cell::new(7, 5)],
            Direction::East,
        );
        // New head (6,5) == body[1]: exempt from the check.
        assert!(snake.advance(grid()));
        assert_eq!(snake.head(), Cell::new(6, 5));
    }

    #[test]
    fn test_collision_on_index_two_and_beyond() {
        let mut snake = snake_with_body(
            &[Cell::new(5, 5), Cell::new(4, 5), Cell::new(6, 5)],
            Direction::East,
        );
        let before = snake.body.clone();
        // New head (6,5) == body[2]: dead, body unchanged.
        assert!(!snake.advance(grid()));
        assert_eq!(snake.body, before);
    }

    #[test]
    fn test_square_loop_self_collision() {
        // Length 5 turning in a tight box revisits a cell at index >= 2.
        let mut snake = snake_with_body(
            &[
                Cell::new(5, 5),
                Cell::new(4, 5),
                Cell::new(3, 5),
                Cell::new(2, 5),
                Cell::new(1, 5),
            ],
            Direction::East,
        );
        assert!(snake.advance(grid())); // (6,5)
        snake.turn(Direction::South);
        assert!(snake.advance(grid())); // (6,6)
        snake.turn(Direction::West);
        assert!(snake.advance(grid())); // (5,6)
        snake.turn(Direction::North);
        assert!(!snake.advance(grid())); // (5,5) is still at index >= 2
    }

    #[test]
    fn test_grow_side_effects_only() {
        let mut snake = Snake::new(grid(), 3);
        let body_before = snake.body.clone();
        snake.grow();
        assert_eq!(snake.length, 4);
        assert_eq!(snake.score, 10);
        assert_eq!(snake.body, body_before);
        snake.grow();
        assert_eq!(snake.length, 5);
        assert_eq!(snake.score, 20);
    }

    #[test]
    fn test_reset_position_keeps_score() {
        let mut snake = Snake::new(grid(), 3);
        snake.turn(Direction::East);
        snake.advance(grid());
        snake.grow();
        snake.reset_position(grid());

        assert_eq!(snake.body, vec![Cell::new(10, 10)]);
        assert_eq!(snake.direction, None);
        assert_eq!(snake.length, 3);
        assert_eq!(snake.score, 10);
    }
}
