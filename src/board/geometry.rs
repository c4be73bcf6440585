//! Board geometry: coordinate to index mapping and bounds checks

use serde::{Deserialize, Serialize};
use std::fmt;

/// Linear index of a cell, `row * cols + col`.
pub type CellIndex = usize;

/// A square on the board, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Square colour on a chequered board; `true` for the colour of (0, 0).
    pub fn is_light(&self) -> bool {
        (self.row + self.col) % 2 == 0
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Rectangular board of `rows` x `cols` squares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: usize,
    cols: usize,
}

impl Board {
    /// Create a board. Dimensions are checked by [`super::TourParameters`].
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Linear index of `(row, col)`, or `None` when the coordinate is off the board.
    ///
    /// Coordinates are signed so that knight offsets from edge squares can be
    /// passed in unchecked.
    #[inline]
    pub fn to_index(&self, row: isize, col: isize) -> Option<CellIndex> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(row * self.cols + col)
    }

    /// Index of a cell known to be unsigned; still bounds-checked.
    #[inline]
    pub fn index_of(&self, cell: Cell) -> Option<CellIndex> {
        if cell.row < self.rows && cell.col < self.cols {
            Some(cell.row * self.cols + cell.col)
        } else {
            None
        }
    }

    /// Inverse of [`Board::to_index`].
    #[inline]
    pub fn cell_of(&self, index: CellIndex) -> Option<Cell> {
        if index < self.cell_count() {
            Some(Cell::new(index / self.cols, index % self.cols))
        } else {
            None
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.index_of(cell).is_some()
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Cell::new(row, col)))
    }

    /// Number of light squares, i.e. squares sharing the colour of (0, 0)
    pub fn light_count(&self) -> usize {
        (self.cell_count() + 1) / 2
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_index_row_major() {
        let board = Board::new(3, 4);
        assert_eq!(board.to_index(0, 0), Some(0));
        assert_eq!(board.to_index(0, 3), Some(3));
        assert_eq!(board.to_index(1, 0), Some(4));
        assert_eq!(board.to_index(2, 3), Some(11));
    }

    #[test]
    fn test_to_index_off_board() {
        let board = Board::new(3, 4);
        assert_eq!(board.to_index(-1, 0), None);
        assert_eq!(board.to_index(0, -2), None);
        assert_eq!(board.to_index(3, 0), None);
        assert_eq!(board.to_index(0, 4), None);
    }

    #[test]
    fn test_cell_of_inverts_to_index() {
        let board = Board::new(5, 7);
        for cell in board.cells() {
            let index = board.index_of(cell).unwrap();
            assert_eq!(board.cell_of(index), Some(cell));
        }
        assert_eq!(board.cell_of(35), None);
    }

    #[test]
    fn test_cells_row_major_order() {
        let board = Board::new(2, 2);
        let cells: Vec<_> = board.cells().collect();
        assert_eq!(
            cells,
            vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)]
        );
    }

    #[test]
    fn test_light_count() {
        assert_eq!(Board::new(5, 5).light_count(), 13);
        assert_eq!(Board::new(4, 4).light_count(), 8);
        assert_eq!(Board::new(1, 1).light_count(), 1);
        assert!(Cell::new(0, 0).is_light());
        assert!(!Cell::new(0, 1).is_light());
    }
}
