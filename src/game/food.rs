use rand::Rng;

use super::grid::{Cell, Grid};

/// How many uniform samples to try before falling back to a linear scan.
/// The grid is large relative to the snake in practice, so the fallback
/// only matters on nearly-full grids.
const MAX_SAMPLE_ATTEMPTS: usize = 1000;

/// The food pellet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub cell: Cell,
}

impl Food {
    /// Spawn food on a random free cell
    pub fn spawn<R: Rng>(rng: &mut R, grid: Grid, occupied: &[Cell]) -> Self {
        let mut food = Self {
            cell: Cell::new(0, 0),
        };
        food.randomize(rng, grid, occupied);
        food
    }

    /// Re-randomize the position uniformly over the grid minus `occupied`.
    ///
    /// Rejection-samples for a bounded number of attempts, then scans for
    /// any free cell. If every cell is occupied the position is left
    /// unchanged rather than looping forever.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R, grid: Grid, occupied: &[Cell]) {
        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let cell = grid.random_cell(rng);
            if !occupied.contains(&cell) {
                self.cell = cell;
                return;
            }
        }

        if let Some(cell) = grid.cells().find(|c| !occupied.contains(c)) {
            self.cell = cell;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_avoids_occupied_cells() {
        let grid = Grid::new(5, 5);
        let occupied: Vec<Cell> = (0..5).map(|col| Cell::new(col, 2)).collect();
        let mut rng = rand::thread_rng();

        for _ in 0..200 {
            let food = Food::spawn(&mut rng, grid, &occupied);
            assert!(!occupied.contains(&food.cell));
        }
    }

    #[test]
    fn test_randomize_with_one_free_cell() {
        // Every cell but one occupied: the scan fallback must find it.
        let grid = Grid::new(3, 3);
        let free = Cell::new(2, 2);
        let occupied: Vec<Cell> = grid.cells().filter(|c| *c != free).collect();
        let mut rng = rand::thread_rng();

        let food = Food::spawn(&mut rng, grid, &occupied);
        assert_eq!(food.cell, free);
    }

    #[test]
    fn test_randomize_full_grid_terminates() {
        let grid = Grid::new(2, 2);
        let occupied: Vec<Cell> = grid.cells().collect();
        let mut rng = rand::thread_rng();

        let mut food = Food { cell: Cell::new(1, 1) };
        food.randomize(&mut rng, grid, &occupied);
        // Position unchanged, and we got here without hanging.
        assert_eq!(food.cell, Cell::new(1, 1));
    }
}
