//! Knight's tour problem definition

use super::decoder::decode;
use super::solution::TourSolution;
use super::validator::TourValidator;
use crate::board::{build_adjacency, AdjacencyRelation, TourParameters};
use crate::config::Settings;
use crate::error::TourError;
use crate::sat::encoder::{ComplexityEstimate, ComplexityLevel, EncodingStatistics, TourEncoder};
use crate::sat::{ConstraintSet, SolveOutcome, SolverGateway};
use log::{debug, info, warn};
use std::fmt;
use std::time::Instant;

/// Result of one tour search
#[derive(Debug, Clone, PartialEq)]
pub enum TourOutcome {
    Solved(TourSolution),
    /// No tour exists for these parameters
    Unsatisfiable,
}

/// Represents a knight's tour problem
pub struct TourProblem {
    params: TourParameters,
    adjacency: AdjacencyRelation,
}

impl TourProblem {
    pub fn new(params: TourParameters) -> Self {
        let adjacency = build_adjacency(&params);
        Self { params, adjacency }
    }

    /// Create a problem from settings, validating them first
    pub fn from_settings(settings: &Settings) -> Result<Self, TourError> {
        Ok(Self::new(settings.tour_parameters()?))
    }

    pub fn params(&self) -> &TourParameters {
        &self.params
    }

    pub fn adjacency(&self) -> &AdjacencyRelation {
        &self.adjacency
    }

    fn encoder(&self) -> TourEncoder<'_> {
        TourEncoder::new(&self.params, &self.adjacency)
    }

    pub fn encode(&self) -> ConstraintSet {
        self.encoder().encode()
    }

    /// Encode, ask `gateway` once, decode and validate the answer
    pub fn solve<G>(&self, gateway: &mut G) -> Result<TourOutcome, TourError>
    where
        G: SolverGateway + ?Sized,
    {
        info!("Searching for a knight's tour: {}", self.params);

        let constraints = self.encode();
        debug!("{}", constraints.statistics());

        let start_time = Instant::now();
        let assignment = match gateway.check(&constraints)? {
            SolveOutcome::Satisfiable(assignment) => assignment,
            SolveOutcome::Unsatisfiable => {
                info!("No tour exists for {}", self.params);
                return Ok(TourOutcome::Unsatisfiable);
            }
        };
        let solve_time = start_time.elapsed();

        let order = decode(&assignment, self.params.cell_count())?;

        let validator = TourValidator::with_adjacency(self.params, self.adjacency.clone());
        let validation = validator.validate(order.as_slice());
        if let Some(violation) = validation.violations.first() {
            warn!("Decoded order is not a tour: {}", violation);
            return Err(TourError::InvalidAssignment {
                cell: violation.cell(),
                reason: violation.to_string(),
            });
        }

        info!(
            "Found a tour in {:.3}s{}",
            solve_time.as_secs_f64(),
            if validation.reentrant && !self.params.is_closed() {
                " (re-entrant)"
            } else {
                ""
            }
        );

        Ok(TourOutcome::Solved(TourSolution::new(
            self.params,
            order,
            validation.reentrant,
            solve_time,
        )))
    }

    /// Get encoding statistics
    pub fn encoding_statistics(&self) -> EncodingStatistics {
        self.encoder().statistics()
    }

    pub fn estimate_complexity(&self) -> ComplexityEstimate {
        self.encoder().estimate_complexity()
    }

    /// Decide from known results on knight's tours whether a tour can exist,
    /// without running a solver
    pub fn estimate_solvability(&self) -> SolvabilityEstimate {
        let rows = self.params.rows();
        let cols = self.params.cols();
        let complexity = self.estimate_complexity();

        let (likelihood, reason) = if self.params.is_closed() {
            if closed_tour_exists(rows, cols) {
                (
                    SolvabilityLikelihood::Guaranteed,
                    "a closed tour exists on this board and passes through every square".to_string(),
                )
            } else {
                (
                    SolvabilityLikelihood::Impossible,
                    format!("a {}x{} board has no closed tour", rows, cols),
                )
            }
        } else if !open_tour_exists(rows, cols) {
            (
                SolvabilityLikelihood::Impossible,
                format!("a {}x{} board has no open tour", rows, cols),
            )
        } else if self.params.cell_count() % 2 == 1 && !self.params.start().is_light() {
            (
                SolvabilityLikelihood::Impossible,
                "on a board with an odd number of squares a tour must start on the majority colour"
                    .to_string(),
            )
        } else if self.params.cell_count() == 1 {
            (
                SolvabilityLikelihood::Guaranteed,
                "a single square is a tour by itself".to_string(),
            )
        } else {
            (
                SolvabilityLikelihood::Possible,
                "open tours exist on this board, though not necessarily from this square".to_string(),
            )
        };

        let recommendations = self.generate_recommendations(&likelihood, &complexity);

        SolvabilityEstimate {
            likelihood,
            reason,
            complexity,
            recommendations,
        }
    }

    fn generate_recommendations(
        &self,
        likelihood: &SolvabilityLikelihood,
        complexity: &ComplexityEstimate,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        if *likelihood == SolvabilityLikelihood::Impossible {
            if self.params.is_closed() && open_tour_exists(self.params.rows(), self.params.cols()) {
                recommendations.push("Try an open tour on this board".to_string());
            } else {
                recommendations.push("The solver will answer unsat".to_string());
            }
        }

        match complexity.complexity_level {
            ComplexityLevel::VeryHigh => {
                recommendations.push("Consider a smaller board".to_string());
                recommendations.push("Set a solver timeout".to_string());
            }
            ComplexityLevel::High => {
                recommendations.push("Set a solver timeout".to_string());
            }
            _ => {}
        }

        if recommendations.is_empty() {
            recommendations.push("Problem looks reasonable to solve".to_string());
        }
        recommendations
    }
}

/// Schwenk's theorem: with `m <= n`, an `m x n` board has a closed tour
/// unless both are odd, `m` is 1, 2 or 4, or `m = 3` and `n` is 4, 6 or 8.
pub fn closed_tour_exists(rows: usize, cols: usize) -> bool {
    let (m, n) = (rows.min(cols), rows.max(cols));
    if m % 2 == 1 && n % 2 == 1 {
        return false;
    }
    if matches!(m, 1 | 2 | 4) {
        return false;
    }
    !(m == 3 && matches!(n, 4 | 6 | 8))
}

/// With `m <= n`, an open tour exists on the 1x1 board, for `m = 3` with
/// `n = 4` or `n >= 7`, for `m = 4` with `n >= 5`, and for every `m >= 5`.
pub fn open_tour_exists(rows: usize, cols: usize) -> bool {
    let (m, n) = (rows.min(cols), rows.max(cols));
    match m {
        1 => n == 1,
        2 => false,
        3 => n == 4 || n >= 7,
        4 => n >= 5,
        _ => true,
    }
}

/// Estimate of problem solvability
#[derive(Debug, Clone)]
pub struct SolvabilityEstimate {
    pub likelihood: SolvabilityLikelihood,
    pub reason: String,
    pub complexity: ComplexityEstimate,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolvabilityLikelihood {
    /// No tour exists
    Impossible,
    /// Tours exist on the board; whether one starts here is for the solver to find out
    Possible,
    /// A tour from the start square is known to exist
    Guaranteed,
}

impl fmt::Display for SolvabilityEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solvability Estimate:")?;
        writeln!(f, "  Likelihood: {:?}", self.likelihood)?;
        writeln!(f, "  Reason: {}", self.reason)?;
        writeln!(f, "  Complexity: {:?}", self.complexity.complexity_level)?;
        writeln!(f, "  Recommendations:")?;
        for rec in &self.recommendations {
            writeln!(f, "    - {}", rec)?;
        }
        Ok(())
    }
}
