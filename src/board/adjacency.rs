//! Knight-move adjacency relation
//!
//! The eight candidate moves from a square `K`:
//!
//! ```text
//! . . 8 . 1 . .
//! . 7 . . . 2 .
//! . . . K . . .
//! . 6 . . . 3 .
//! . . 5 . 4 . .
//! ```

use super::{Board, CellIndex, TourParameters};

/// Knight offsets as `(row delta, col delta)`, clockwise from the upper right.
pub const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (-2, 1),
    (-1, 2),
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
];

/// For every cell, the cells one knight move away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyRelation {
    neighbors: Vec<Vec<CellIndex>>,
}

impl AdjacencyRelation {
    /// Enumerate the knight moves of every cell on `board`.
    pub fn build(board: &Board) -> Self {
        let neighbors = board
            .cells()
            .map(|cell| {
                let (row, col) = (cell.row as isize, cell.col as isize);
                KNIGHT_OFFSETS
                    .iter()
                    .filter_map(|&(dr, dc)| board.to_index(row + dr, col + dc))
                    .collect()
            })
            .collect();

        Self { neighbors }
    }

    /// Neighbours of `cell`; empty for an index outside the board
    pub fn neighbors(&self, cell: CellIndex) -> &[CellIndex] {
        self.neighbors.get(cell).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, cell: CellIndex) -> usize {
        self.neighbors(cell).len()
    }

    pub fn are_adjacent(&self, from: CellIndex, to: CellIndex) -> bool {
        self.neighbors(from).contains(&to)
    }

    pub fn cell_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Total number of directed moves
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum()
    }

    /// Cells that cannot be entered or left by any knight move
    pub fn isolated_cells(&self) -> Vec<CellIndex> {
        (0..self.cell_count()).filter(|&c| self.degree(c) == 0).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellIndex, &[CellIndex])> {
        self.neighbors.iter().enumerate().map(|(c, n)| (c, n.as_slice()))
    }
}

/// Build the adjacency relation for the board described by `params`.
pub fn build_adjacency(params: &TourParameters) -> AdjacencyRelation {
    AdjacencyRelation::build(params.board())
}
