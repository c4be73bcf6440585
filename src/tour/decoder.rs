//! Turning a satisfying assignment back into a visit order

use crate::board::CellIndex;
use crate::error::TourError;
use crate::sat::Assignment;
use serde::{Deserialize, Serialize};

/// `order[t]` is the cell visited at step `t`.
///
/// Only produced by [`decode`] (or by deserializing a saved solution), so a
/// value always holds every cell index below its length exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TourOrder {
    order: Vec<CellIndex>,
}

impl TourOrder {
    pub(crate) fn new(order: Vec<CellIndex>) -> Self {
        Self { order }
    }

    pub fn as_slice(&self) -> &[CellIndex] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Cell visited at `step`
    pub fn cell_at(&self, step: usize) -> Option<CellIndex> {
        self.order.get(step).copied()
    }

    /// Step at which `cell` is visited
    pub fn step_of(&self, cell: CellIndex) -> Option<usize> {
        self.order.iter().position(|&c| c == cell)
    }

    /// Step numbers laid out row by row
    pub fn step_grid(&self, cols: usize) -> Vec<Vec<usize>> {
        if cols == 0 {
            return Vec::new();
        }
        let mut steps = vec![0; self.order.len()];
        for (step, &cell) in self.order.iter().enumerate() {
            if let Some(slot) = steps.get_mut(cell) {
                *slot = step;
            }
        }
        steps.chunks(cols).map(<[usize]>::to_vec).collect()
    }

    /// Consecutive (from, to) cell pairs
    pub fn moves(&self) -> impl Iterator<Item = (CellIndex, CellIndex)> + '_ {
        self.order.windows(2).map(|pair| (pair[0], pair[1]))
    }

    pub fn first(&self) -> Option<CellIndex> {
        self.order.first().copied()
    }

    pub fn last(&self) -> Option<CellIndex> {
        self.order.last().copied()
    }

    pub fn into_vec(self) -> Vec<CellIndex> {
        self.order
    }
}

/// Recover the visit order from the state words.
///
/// Each word must be exactly `cell_count` bits wide with a single bit set; the
/// position of that bit is the cell's step. Two cells on the same step, or a
/// word that is not a power of two, mean the encoder and the solver disagree,
/// which is reported as [`TourError::InvalidAssignment`].
pub fn decode(assignment: &Assignment, cell_count: usize) -> Result<TourOrder, TourError> {
    if assignment.len() != cell_count {
        return Err(TourError::assignment(
            assignment.len().min(cell_count),
            format!("expected {} words, got {}", cell_count, assignment.len()),
        ));
    }

    let mut slots: Vec<Option<CellIndex>> = vec![None; cell_count];
    for (cell, word) in assignment.values().iter().enumerate() {
        if word.width() != cell_count {
            return Err(TourError::assignment(
                cell,
                format!("word is {} bits wide, expected {}", word.width(), cell_count),
            ));
        }
        let step = word.step().ok_or_else(|| {
            TourError::assignment(cell, format!("value {} is not a power of two", word.value()))
        })?;
        match slots[step] {
            Some(other) => {
                return Err(TourError::assignment(
                    cell,
                    format!("step {} is already taken by cell {}", step, other),
                ))
            }
            None => slots[step] = Some(cell),
        }
    }

    // Every cell landed on a distinct step and there are as many steps as cells
    let order = slots.into_iter().flatten().collect();
    Ok(TourOrder::new(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::StateWord;

    fn one_hot(width: usize, steps: &[usize]) -> Assignment {
        Assignment::new(
            width,
            steps.iter().map(|&s| StateWord::one_hot(width, s)).collect(),
        )
    }

    #[test]
    fn test_decode_places_cells_by_step() {
        let order = decode(&one_hot(4, &[0, 3, 1, 2]), 4).unwrap();
        assert_eq!(order.as_slice(), &[0, 2, 3, 1]);
        assert_eq!(order.step_of(1), Some(3));
        assert_eq!(order.cell_at(1), Some(2));
    }

    #[test]
    fn test_decode_is_idempotent() {
        let assignment = Assignment::from_order(&[4, 1, 0, 3, 2]).unwrap();
        let first = decode(&assignment, 5).unwrap();
        let second = decode(&assignment, 5).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_slice(), &[4, 1, 0, 3, 2]);
    }

    #[test]
    fn test_single_cell() {
        let order = decode(&one_hot(1, &[0]), 1).unwrap();
        assert_eq!(order.as_slice(), &[0]);
    }

    #[test]
    fn test_not_power_of_two() {
        let assignment = Assignment::new(
            3,
            vec![
                StateWord::one_hot(3, 0),
                StateWord::from_u64(3, 0b110),
                StateWord::one_hot(3, 1),
            ],
        );
        let err = decode(&assignment, 3).unwrap_err();
        assert!(matches!(err, TourError::InvalidAssignment { cell: 1, .. }));
    }

    #[test]
    fn test_zero_word_rejected() {
        let assignment = Assignment::new(2, vec![StateWord::one_hot(2, 0), StateWord::zero(2)]);
        assert!(matches!(
            decode(&assignment, 2),
            Err(TourError::InvalidAssignment { cell: 1, .. })
        ));
    }

    #[test]
    fn test_duplicate_step() {
        let err = decode(&one_hot(3, &[0, 2, 2]), 3).unwrap_err();
        assert!(matches!(err, TourError::InvalidAssignment { cell: 2, .. }));
        assert!(err.to_string().contains("already taken by cell 1"));
    }

    #[test]
    fn test_wrong_length_and_width() {
        assert!(matches!(
            decode(&one_hot(3, &[0, 1]), 3),
            Err(TourError::InvalidAssignment { cell: 2, .. })
        ));
        assert!(matches!(
            decode(&one_hot(4, &[0, 1, 2]), 3),
            Err(TourError::InvalidAssignment { cell: 0, .. })
        ));
    }

    #[test]
    fn test_step_grid_and_moves() {
        let order = TourOrder::new(vec![0, 5, 2, 3, 4, 1]);
        assert_eq!(order.step_grid(3), vec![vec![0, 5, 2], vec![3, 4, 1]]);
        let moves: Vec<_> = order.moves().collect();
        assert_eq!(moves[0], (0, 5));
        assert_eq!(moves.len(), 5);
        assert_eq!(order.first(), Some(0));
        assert_eq!(order.last(), Some(1));
    }
}
