//! Tour encoder: knight's tour as word-level constraints
//!
//! Each cell `i` owns a state word `V[i]` with one bit per cell. The single set
//! bit marks the step at which the cell is visited. "Cell `i` is visited right
//! after its neighbour `j`" becomes `V[i] == rotl(V[j], 1)`, an equality rather
//! than an arithmetic successor relation.

use super::constraints::{Constraint, ConstraintSet, WordTerm};
use super::word::StateWord;
use crate::board::{AdjacencyRelation, CellIndex, TourParameters};
use log::debug;
use std::fmt;

/// Builds the constraint set for one set of tour parameters
pub struct TourEncoder<'a> {
    params: &'a TourParameters,
    adjacency: &'a AdjacencyRelation,
}

impl<'a> TourEncoder<'a> {
    pub fn new(params: &'a TourParameters, adjacency: &'a AdjacencyRelation) -> Self {
        Self { params, adjacency }
    }

    /// Conjunction of start, uniqueness, succession and (open tours only) one-hot constraints
    pub fn encode(&self) -> ConstraintSet {
        let mut set = ConstraintSet::new(self.params.cell_count());

        set.push(self.start_constraint());
        set.push(self.uniqueness_constraint());
        set.extend(self.succession_constraints());

        // A closed tour forces every word to be one-hot through the cycle.
        // An open tour has no such closure, so it is asserted directly.
        if !self.params.is_closed() {
            set.extend(self.one_hot_constraints());
        }

        debug!(
            "encoded {} with {} constraints",
            self.params,
            set.len()
        );
        set
    }

    /// The start cell is visited at step 0: `V[start] == 1`
    pub fn start_constraint(&self) -> Constraint {
        let width = self.params.cell_count();
        Constraint::Equal(
            WordTerm::State(self.params.start_index()),
            WordTerm::Constant(StateWord::one_hot(width, 0)),
        )
    }

    /// No two cells share a step
    pub fn uniqueness_constraint(&self) -> Constraint {
        Constraint::Distinct((0..self.params.cell_count()).map(WordTerm::State).collect())
    }

    /// One disjunction per cell with a predecessor.
    ///
    /// The start of an open tour has no predecessor and is skipped. In a closed
    /// tour the start must follow the last cell, which closes the cycle.
    pub fn succession_constraints(&self) -> Vec<Constraint> {
        let start = self.params.start_index();
        (0..self.params.cell_count())
            .filter(|&cell| self.params.is_closed() || cell != start)
            .map(|cell| self.succession_constraint(cell))
            .collect()
    }

    /// `V[cell] == rotl(V[j], 1)` for some neighbour `j`
    pub fn succession_constraint(&self, cell: CellIndex) -> Constraint {
        Constraint::AnyOf(
            self.adjacency
                .neighbors(cell)
                .iter()
                .map(|&pred| {
                    Constraint::Equal(
                        WordTerm::State(cell),
                        WordTerm::Rotated {
                            cell: pred,
                            amount: 1,
                        },
                    )
                })
                .collect(),
        )
    }

    /// Every word has exactly one bit set
    pub fn one_hot_constraints(&self) -> Vec<Constraint> {
        (0..self.params.cell_count())
            .map(|cell| Constraint::PowerOfTwo(WordTerm::State(cell)))
            .collect()
    }

    /// Rough size of the CNF the gateway will produce
    pub fn estimate_complexity(&self) -> ComplexityEstimate {
        let n = self.params.cell_count();
        let moves = self.adjacency.edge_count();

        let pairs = n.saturating_mul(n.saturating_sub(1)) / 2;
        let state_variables = n.saturating_mul(n);
        // One difference literal per pair and bit, one selector per candidate predecessor
        let distinct_variables = pairs.saturating_mul(n);
        let estimated_variables = state_variables
            .saturating_add(distinct_variables)
            .saturating_add(moves);

        let mut estimated_clauses = pairs
            .saturating_mul(n.saturating_mul(2).saturating_add(1))
            .saturating_add(moves.saturating_mul(n).saturating_mul(2))
            .saturating_add(n)
            .saturating_add(1);
        if !self.params.is_closed() {
            // at-least-one plus sequential-counter at-most-one
            estimated_clauses = estimated_clauses
                .saturating_add(n.saturating_mul(n.saturating_mul(3).saturating_add(1)));
        }

        let complexity_level = match estimated_variables {
            0..=9_999 => ComplexityLevel::Low,
            10_000..=99_999 => ComplexityLevel::Medium,
            100_000..=999_999 => ComplexityLevel::High,
            _ => ComplexityLevel::VeryHigh,
        };

        ComplexityEstimate {
            complexity_level,
            cell_count: n,
            knight_moves: moves,
            estimated_variables,
            estimated_clauses,
        }
    }

    pub fn statistics(&self) -> EncodingStatistics {
        let set = self.encode();
        EncodingStatistics {
            rows: self.params.rows(),
            cols: self.params.cols(),
            closed: self.params.is_closed(),
            word_width: set.word_width(),
            constraints: set.statistics(),
        }
    }
}

/// Statistics about the word-level encoding
#[derive(Debug, Clone)]
pub struct EncodingStatistics {
    pub rows: usize,
    pub cols: usize,
    pub closed: bool,
    pub word_width: usize,
    pub constraints: super::constraints::ConstraintStatistics,
}

/// Complexity estimate for the problem
#[derive(Debug, Clone)]
pub struct ComplexityEstimate {
    pub complexity_level: ComplexityLevel,
    pub cell_count: usize,
    pub knight_moves: usize,
    pub estimated_variables: usize,
    pub estimated_clauses: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tour Encoding Statistics:")?;
        writeln!(f, "  Board: {}x{}", self.rows, self.cols)?;
        writeln!(f, "  Tour: {}", if self.closed { "closed" } else { "open" })?;
        writeln!(f, "  Word width: {} bits", self.word_width)?;
        write!(f, "{}", self.constraints)
    }
}

impl fmt::Display for ComplexityEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Problem Complexity Estimate:")?;
        writeln!(f, "  Complexity level: {:?}", self.complexity_level)?;
        writeln!(f, "  Cells: {}", self.cell_count)?;
        writeln!(f, "  Knight moves: {}", self.knight_moves)?;
        writeln!(f, "  Estimated variables: {}", self.estimated_variables)?;
        writeln!(f, "  Estimated clauses: {}", self.estimated_clauses)?;

        let recommendation = match self.complexity_level {
            ComplexityLevel::Low => "Should solve quickly",
            ComplexityLevel::Medium => "May take some time to solve",
            ComplexityLevel::High => "Likely to be slow, consider a smaller board",
            ComplexityLevel::VeryHigh => "Very large encoding, expect long solve times",
        };
        writeln!(f, "  Recommendation: {}", recommendation)
    }
}
