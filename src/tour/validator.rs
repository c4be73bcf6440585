//! Tour validation against the board and the tour parameters

use crate::board::{build_adjacency, AdjacencyRelation, CellIndex, TourParameters};
use std::fmt;

/// Checks that a visit order is a knight's tour for a given set of parameters
pub struct TourValidator {
    params: TourParameters,
    adjacency: AdjacencyRelation,
}

/// Result of tour validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error_message: Option<String>,
    pub violations: Vec<TourViolation>,
    pub moves_checked: usize,
    /// Last cell is one knight move from the first
    pub reentrant: bool,
}

/// A single way in which an order fails to be a tour
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourViolation {
    WrongLength { expected: usize, actual: usize },
    OutOfRange { step: usize, cell: CellIndex },
    Revisited { cell: CellIndex, first_step: usize, step: usize },
    WrongStart { expected: CellIndex, actual: CellIndex },
    IllegalMove { step: usize, from: CellIndex, to: CellIndex },
    NotClosed { last: CellIndex, first: CellIndex },
}

impl TourViolation {
    /// The cell the violation is attributed to
    pub fn cell(&self) -> CellIndex {
        match *self {
            TourViolation::WrongLength { actual, .. } => actual,
            TourViolation::OutOfRange { cell, .. } => cell,
            TourViolation::Revisited { cell, .. } => cell,
            TourViolation::WrongStart { actual, .. } => actual,
            TourViolation::IllegalMove { to, .. } => to,
            TourViolation::NotClosed { last, .. } => last,
        }
    }
}

impl TourValidator {
    pub fn new(params: TourParameters) -> Self {
        let adjacency = build_adjacency(&params);
        Self { params, adjacency }
    }

    pub fn with_adjacency(params: TourParameters, adjacency: AdjacencyRelation) -> Self {
        Self { params, adjacency }
    }

    /// Check every tour property and collect all violations
    pub fn validate(&self, order: &[CellIndex]) -> ValidationResult {
        let cell_count = self.params.cell_count();
        let mut violations = Vec::new();

        if order.len() != cell_count {
            violations.push(TourViolation::WrongLength {
                expected: cell_count,
                actual: order.len(),
            });
        }

        let mut first_seen: Vec<Option<usize>> = vec![None; cell_count];
        for (step, &cell) in order.iter().enumerate() {
            match first_seen.get_mut(cell) {
                None => violations.push(TourViolation::OutOfRange { step, cell }),
                Some(Some(first_step)) => violations.push(TourViolation::Revisited {
                    cell,
                    first_step: *first_step,
                    step,
                }),
                Some(slot) => *slot = Some(step),
            }
        }

        let start = self.params.start_index();
        if let Some(&first) = order.first() {
            if first != start {
                violations.push(TourViolation::WrongStart {
                    expected: start,
                    actual: first,
                });
            }
        }

        let mut moves_checked = 0;
        for (step, pair) in order.windows(2).enumerate() {
            moves_checked += 1;
            if !self.adjacency.are_adjacent(pair[0], pair[1]) {
                violations.push(TourViolation::IllegalMove {
                    step: step + 1,
                    from: pair[0],
                    to: pair[1],
                });
            }
        }

        let reentrant = match (order.first(), order.last()) {
            (Some(&first), Some(&last)) => self.adjacency.are_adjacent(last, first),
            _ => false,
        };
        if self.params.is_closed() && !reentrant {
            if let (Some(&first), Some(&last)) = (order.first(), order.last()) {
                violations.push(TourViolation::NotClosed { last, first });
            }
        }

        let is_valid = violations.is_empty();
        let error_message = if is_valid {
            None
        } else {
            Some(
                violations
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        };

        ValidationResult {
            is_valid,
            error_message,
            violations,
            moves_checked,
            reentrant,
        }
    }

    pub fn params(&self) -> &TourParameters {
        &self.params
    }
}

impl fmt::Display for TourViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TourViolation::WrongLength { expected, actual } => {
                write!(f, "tour visits {} squares, board has {}", actual, expected)
            }
            TourViolation::OutOfRange { step, cell } => {
                write!(f, "step {} visits cell {} which is off the board", step, cell)
            }
            TourViolation::Revisited { cell, first_step, step } => write!(
                f,
                "cell {} visited at step {} and again at step {}",
                cell, first_step, step
            ),
            TourViolation::WrongStart { expected, actual } => {
                write!(f, "tour starts at cell {} instead of {}", actual, expected)
            }
            TourViolation::IllegalMove { step, from, to } => {
                write!(f, "step {}: {} -> {} is not a knight move", step, from, to)
            }
            TourViolation::NotClosed { last, first } => write!(
                f,
                "closed tour ends at {} which is not a knight move from {}",
                last, first
            ),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation Result:")?;
        writeln!(f, "  Valid: {}", self.is_valid)?;
        writeln!(f, "  Moves checked: {}", self.moves_checked)?;
        writeln!(f, "  Re-entrant: {}", self.reentrant)?;
        if !self.violations.is_empty() {
            writeln!(f, "  Violations:")?;
            for violation in &self.violations {
                writeln!(f, "    - {}", violation)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    // A known open tour of the 3x4 board from the top-left corner
    const OPEN_3X4: [CellIndex; 12] = [0, 6, 8, 1, 7, 9, 2, 11, 5, 3, 10, 4];

    #[test]
    fn test_valid_open_tour() {
        let validator = TourValidator::new(TourParameters::open(3, 4).unwrap());
        let result = validator.validate(&OPEN_3X4);
        assert!(result.is_valid, "{}", result);
        assert_eq!(result.moves_checked, 11);
        assert!(result.error_message.is_none());
    }

    #[test]
    fn test_open_tour_is_not_closed() {
        let validator = TourValidator::new(TourParameters::closed(3, 4).unwrap());
        let result = validator.validate(&OPEN_3X4);
        assert!(!result.is_valid);
        assert_eq!(
            result.violations,
            vec![TourViolation::NotClosed { last: 4, first: 0 }]
        );
    }

    #[test]
    fn test_wrong_start() {
        let params = TourParameters::new(3, 4, Cell::new(0, 1), false).unwrap();
        let result = TourValidator::new(params).validate(&OPEN_3X4);
        assert!(result
            .violations
            .contains(&TourViolation::WrongStart { expected: 1, actual: 0 }));
    }

    #[test]
    fn test_illegal_move_and_revisit() {
        let validator = TourValidator::new(TourParameters::open(3, 4).unwrap());
        let mut order = OPEN_3X4;
        order[11] = 10;

        let result = validator.validate(&order);
        assert!(!result.is_valid);
        assert!(result.violations.contains(&TourViolation::Revisited {
            cell: 10,
            first_step: 10,
            step: 11
        }));
        assert!(result.violations.contains(&TourViolation::IllegalMove {
            step: 11,
            from: 10,
            to: 10
        }));
        assert!(result.error_message.unwrap().contains("not a knight move"));
    }

    #[test]
    fn test_length_and_range() {
        let validator = TourValidator::new(TourParameters::open(3, 4).unwrap());
        let result = validator.validate(&[0, 6, 40]);
        assert!(result.violations.contains(&TourViolation::WrongLength {
            expected: 12,
            actual: 3
        }));
        assert!(result
            .violations
            .contains(&TourViolation::OutOfRange { step: 2, cell: 40 }));
    }

    #[test]
    fn test_single_cell_open_tour() {
        let validator = TourValidator::new(TourParameters::open(1, 1).unwrap());
        let result = validator.validate(&[0]);
        assert!(result.is_valid);
        assert!(!result.reentrant);
    }
}
