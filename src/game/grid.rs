use rand::Rng;

use super::direction::Direction;

/// A cell on the game grid, in grid units (not pixels)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Offset this cell by a raw delta (no wrapping)
    pub fn offset(&self, dc: i32, dr: i32) -> Self {
        Self {
            col: self.col + dc,
            row: self.row + dr,
        }
    }
}

/// Fixed-size toroidal grid: stepping past an edge reenters on the
/// opposite side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Wrap a cell back onto the grid, each axis independently
    pub fn wrap(&self, cell: Cell) -> Cell {
        Cell {
            col: cell.col.rem_euclid(self.width),
            row: cell.row.rem_euclid(self.height),
        }
    }

    /// One step from `cell` in `direction`, with wraparound
    pub fn step(&self, cell: Cell, direction: Direction) -> Cell {
        let (dc, dr) = direction.delta();
        self.wrap(cell.offset(dc, dr))
    }

    /// The center cell, used as the snake spawn point
    pub fn center(&self) -> Cell {
        Cell::new(self.width / 2, self.height / 2)
    }

    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Cell {
        Cell::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height))
    }

    /// Iterate every cell of the grid in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let width = self.width;
        (0..self.height).flat_map(move |row| (0..width).map(move |col| Cell::new(col, row)))
    }

    pub fn cell_count(&self) -> usize {
        (self.width * self.height) as usize
    }
}
