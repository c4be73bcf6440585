//! Knight's Tour SAT Solver
//!
//! This library finds open and closed knight's tours on rectangular boards by
//! encoding the visit order as one-hot bit-vectors and handing the resulting
//! constraints to a SAT solver.

pub mod board;
pub mod config;
pub mod error;
pub mod sat;
pub mod tour;
pub mod utils;

pub use config::Settings;
pub use error::TourError;
pub use tour::{TourOutcome, TourProblem, TourSolution};

use sat::{SatGateway, SolverOptions};

/// Main entry point: solve the tour described by `settings` with the configured backend
pub fn solve_tour(settings: &Settings) -> Result<TourOutcome, TourError> {
    let problem = TourProblem::from_settings(settings)?;
    let mut gateway = SatGateway::new(
        settings.solver.backend,
        SolverOptions::with_timeout_seconds(settings.solver.timeout_seconds),
    );
    problem.solve(&mut gateway)
}
