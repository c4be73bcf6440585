//! Validated tour configuration

use super::{Board, Cell, CellIndex};
use crate::error::TourError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest number of state-bit variables a board may need
pub const MAX_STATE_VARIABLES: usize = i32::MAX as usize;

/// Immutable input to one tour search.
///
/// Construction goes through [`TourParameters::new`], so a value of this type
/// always describes a non-empty board with the start cell on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourParameters {
    board: Board,
    start: Cell,
    closed: bool,
}

impl TourParameters {
    pub fn new(rows: usize, cols: usize, start: Cell, closed: bool) -> Result<Self, TourError> {
        if rows == 0 {
            return Err(TourError::config("rows", "must be at least 1"));
        }
        if cols == 0 {
            return Err(TourError::config("cols", "must be at least 1"));
        }
        // One SAT variable per (cell, bit) pair, and every id must be a positive i32
        let fits = rows
            .checked_mul(cols)
            .and_then(|cells| cells.checked_mul(cells))
            .is_some_and(|bits| bits <= MAX_STATE_VARIABLES);
        if !fits {
            return Err(TourError::config(
                "rows",
                format!(
                    "board {}x{} is too large: its state bits exceed {} SAT variables",
                    rows, cols, MAX_STATE_VARIABLES
                ),
            ));
        }
        if start.row >= rows {
            return Err(TourError::config(
                "start_row",
                format!("{} is outside 0..{}", start.row, rows),
            ));
        }
        if start.col >= cols {
            return Err(TourError::config(
                "start_col",
                format!("{} is outside 0..{}", start.col, cols),
            ));
        }

        Ok(Self {
            board: Board::new(rows, cols),
            start,
            closed,
        })
    }

    /// Open tour from the top-left corner
    pub fn open(rows: usize, cols: usize) -> Result<Self, TourError> {
        Self::new(rows, cols, Cell::new(0, 0), false)
    }

    /// Closed tour from the top-left corner
    pub fn closed(rows: usize, cols: usize) -> Result<Self, TourError> {
        Self::new(rows, cols, Cell::new(0, 0), true)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn rows(&self) -> usize {
        self.board.rows()
    }

    pub fn cols(&self) -> usize {
        self.board.cols()
    }

    pub fn cell_count(&self) -> usize {
        self.board.cell_count()
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn start_index(&self) -> CellIndex {
        self.start.row * self.board.cols() + self.start.col
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl fmt::Display for TourParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} board, start {}, {} tour",
            self.board,
            self.start,
            if self.closed { "closed" } else { "open" }
        )
    }
}
