//! SAT solver integration using CaDiCaL

use super::cnf::Clause;
use anyhow::Result;
use cadical::{Solver, Timeout};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// SAT solver wrapper for CaDiCaL
pub struct SatSolver {
    solver: Solver,
    variable_count: usize,
    clause_count: usize,
    timeout: Option<Duration>,
    last_result: Option<(SolverResultType, Duration)>,
}

/// Result of SAT solving
#[derive(Debug, Clone)]
pub struct SolverSolution {
    pub assignment: HashMap<i32, bool>,
    pub solve_time: Duration,
}

/// Statistics about the solving process
#[derive(Debug, Clone)]
pub struct SolverStatistics {
    pub variable_count: usize,
    pub clause_count: usize,
    pub solve_time: Duration,
    pub result: SolverResultType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverResultType {
    NotSolved,
    Satisfiable,
    Unsatisfiable,
    Timeout,
}

impl SatSolver {
    /// Create a new SAT solver instance
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            variable_count: 0,
            clause_count: 0,
            timeout: None,
            last_result: None,
        }
    }

    /// Set solving timeout
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
        self.solver
            .set_callbacks(Some(Timeout::new(timeout.as_secs_f32())));
    }

    /// Add clauses to the solver
    pub fn add_clauses(&mut self, clauses: &[Clause]) -> Result<()> {
        for clause in clauses {
            self.add_clause(clause)?;
        }
        Ok(())
    }

    /// Add a single clause to the solver
    pub fn add_clause(&mut self, clause: &Clause) -> Result<()> {
        if clause.is_empty() {
            anyhow::bail!("Cannot add empty clause (unsatisfiable)");
        }

        for &literal in &clause.literals {
            let var = literal.unsigned_abs() as usize;
            if var > self.variable_count {
                self.variable_count = var;
            }
        }

        self.solver.add_clause(clause.literals.iter().copied());

        self.clause_count += 1;
        Ok(())
    }

    /// Make sure variables up to `count` are reported in the model even if no clause mentions them
    pub fn reserve_variables(&mut self, count: usize) {
        self.variable_count = self.variable_count.max(count);
    }

    /// Solve the SAT problem. `Ok(None)` means unsatisfiable; an interrupted
    /// search (timeout) is an error.
    pub fn solve(&mut self) -> Result<Option<SolverSolution>> {
        let start_time = Instant::now();
        let result = self.solver.solve();
        let solve_time = start_time.elapsed();

        match result {
            Some(true) => {
                self.last_result = Some((SolverResultType::Satisfiable, solve_time));
                let assignment = self.extract_assignment();
                Ok(Some(SolverSolution {
                    assignment,
                    solve_time,
                }))
            }
            Some(false) => {
                self.last_result = Some((SolverResultType::Unsatisfiable, solve_time));
                Ok(None)
            }
            None => {
                self.last_result = Some((SolverResultType::Timeout, solve_time));
                match self.timeout {
                    Some(timeout) => anyhow::bail!(
                        "CaDiCaL gave up after {:.1}s (timeout {}s)",
                        solve_time.as_secs_f64(),
                        timeout.as_secs()
                    ),
                    None => anyhow::bail!("CaDiCaL was interrupted before reaching a result"),
                }
            }
        }
    }

    /// Extract variable assignment from the solver. Variables the solver left
    /// unassigned are reported as false.
    fn extract_assignment(&self) -> HashMap<i32, bool> {
        let known = self.solver.max_variable();
        (1..=self.variable_count as i32)
            .map(|var| {
                let value = if var <= known {
                    self.solver.value(var).unwrap_or(false)
                } else {
                    false
                };
                (var, value)
            })
            .collect()
    }

    /// Get solver statistics
    pub fn statistics(&self) -> SolverStatistics {
        let (result, solve_time) = self
            .last_result
            .unwrap_or((SolverResultType::NotSolved, Duration::ZERO));
        SolverStatistics {
            variable_count: self.variable_count,
            clause_count: self.clause_count,
            solve_time,
            result,
        }
    }

    /// Get the number of variables
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Get the number of clauses
    pub fn clause_count(&self) -> usize {
        self.clause_count
    }

    /// Set solver configuration options
    pub fn configure(&mut self, options: &SolverOptions) {
        if let Some(timeout) = options.timeout {
            self.set_timeout(timeout);
        }
    }
}

impl Default for SatSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration options for the SAT solver
#[derive(Debug, Clone, Default)]
pub struct SolverOptions {
    pub timeout: Option<Duration>,
}

impl SolverOptions {
    /// Options with a timeout in whole seconds; zero means no limit
    pub fn with_timeout_seconds(seconds: u64) -> Self {
        Self {
            timeout: (seconds > 0).then_some(Duration::from_secs(seconds)),
        }
    }
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Solver Statistics:")?;
        writeln!(f, "  Variables: {}", self.variable_count)?;
        writeln!(f, "  Clauses: {}", self.clause_count)?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        writeln!(f, "  Result: {:?}", self.result)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_creation() {
        let solver = SatSolver::new();
        assert_eq!(solver.variable_count(), 0);
        assert_eq!(solver.clause_count(), 0);
        assert_eq!(solver.statistics().result, SolverResultType::NotSolved);
    }

    #[test]
    fn test_simple_satisfiable() {
        let mut solver = SatSolver::new();

        // x1 ∨ x2, ¬x1 ∨ x2
        solver.add_clause(&Clause::new(vec![1, 2])).unwrap();
        solver.add_clause(&Clause::new(vec![-1, 2])).unwrap();

        let solution = solver.solve().unwrap();
        assert!(solution.is_some());

        let assignment = solution.unwrap().assignment;
        assert_eq!(assignment.get(&2), Some(&true));
        assert_eq!(solver.statistics().result, SolverResultType::Satisfiable);
    }

    #[test]
    fn test_unsatisfiable() {
        let mut solver = SatSolver::new();

        solver.add_clause(&Clause::unit(1)).unwrap();
        solver.add_clause(&Clause::unit(-1)).unwrap();

        let solution = solver.solve().unwrap();
        assert!(solution.is_none());
        assert_eq!(solver.statistics().result, SolverResultType::Unsatisfiable);
    }

    #[test]
    fn test_solver_options() {
        let mut solver = SatSolver::new();
        solver.configure(&SolverOptions::with_timeout_seconds(10));
        solver.add_clause(&Clause::unit(3)).unwrap();

        let solution = solver.solve().unwrap().unwrap();
        assert_eq!(solution.assignment.get(&3), Some(&true));
    }

    #[test]
    fn test_zero_timeout_means_unlimited() {
        assert!(SolverOptions::with_timeout_seconds(0).timeout.is_none());
        assert_eq!(
            SolverOptions::with_timeout_seconds(5).timeout,
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn test_empty_clause_error() {
        let mut solver = SatSolver::new();
        assert!(solver.add_clause(&Clause::new(vec![])).is_err());
    }

    #[test]
    fn test_variable_count_tracking() {
        let mut solver = SatSolver::new();

        solver.add_clause(&Clause::new(vec![1, -5, 3])).unwrap();
        assert_eq!(solver.variable_count(), 5);

        solver.add_clause(&Clause::new(vec![2, -7])).unwrap();
        assert_eq!(solver.variable_count(), 7);

        solver.reserve_variables(10);
        let solution = solver.solve().unwrap().unwrap();
        assert_eq!(solution.assignment.len(), 10);
    }
}
