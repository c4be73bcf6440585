//! Factory for creating SAT solver instances based on configuration

use super::cnf::Clause;
use super::solver::{SatSolver, SolverOptions, SolverSolution, SolverStatistics};
use super::varisat_solver::VarisatSatSolver;
use crate::config::SolverBackend;
use anyhow::Result;

/// Unified SAT solver interface that can use different backends
pub enum UnifiedSatSolver {
    Cadical(SatSolver),
    Varisat(VarisatSatSolver),
}

impl UnifiedSatSolver {
    /// Create a new solver instance based on the specified backend
    pub fn new(backend: SolverBackend) -> Self {
        match backend {
            SolverBackend::Cadical => UnifiedSatSolver::Cadical(SatSolver::new()),
            SolverBackend::Varisat => UnifiedSatSolver::Varisat(VarisatSatSolver::new()),
        }
    }

    /// Add clauses to the solver
    pub fn add_clauses(&mut self, clauses: &[Clause]) -> Result<()> {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.add_clauses(clauses),
            UnifiedSatSolver::Varisat(solver) => solver.add_clauses(clauses),
        }
    }

    /// Add a single clause to the solver
    pub fn add_clause(&mut self, clause: &Clause) -> Result<()> {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.add_clause(clause),
            UnifiedSatSolver::Varisat(solver) => solver.add_clause(clause),
        }
    }

    pub fn reserve_variables(&mut self, count: usize) {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.reserve_variables(count),
            UnifiedSatSolver::Varisat(solver) => solver.reserve_variables(count),
        }
    }

    /// Solve the SAT problem and return the first solution
    pub fn solve(&mut self) -> Result<Option<SolverSolution>> {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.solve(),
            UnifiedSatSolver::Varisat(solver) => solver.solve(),
        }
    }

    /// Get solver statistics
    pub fn statistics(&self) -> SolverStatistics {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.statistics(),
            UnifiedSatSolver::Varisat(solver) => solver.statistics(),
        }
    }

    /// Get the number of variables
    pub fn variable_count(&self) -> usize {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.variable_count(),
            UnifiedSatSolver::Varisat(solver) => solver.variable_count(),
        }
    }

    /// Get the number of clauses
    pub fn clause_count(&self) -> usize {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.clause_count(),
            UnifiedSatSolver::Varisat(solver) => solver.clause_count(),
        }
    }

    /// Set solver configuration options
    pub fn configure(&mut self, options: &SolverOptions) {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.configure(options),
            UnifiedSatSolver::Varisat(solver) => solver.configure(options),
        }
    }

    /// Get the backend type being used
    pub fn backend(&self) -> SolverBackend {
        match self {
            UnifiedSatSolver::Cadical(_) => SolverBackend::Cadical,
            UnifiedSatSolver::Varisat(_) => SolverBackend::Varisat,
        }
    }
}

impl Default for UnifiedSatSolver {
    fn default() -> Self {
        UnifiedSatSolver::Cadical(SatSolver::new())
    }
}
