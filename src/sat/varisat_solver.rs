//! Varisat SAT solver integration

use super::cnf::Clause;
use super::solver::{SolverOptions, SolverResultType, SolverSolution, SolverStatistics};
use anyhow::Result;
use log::warn;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use varisat::{ExtendFormula, Lit, Solver};

/// SAT solver wrapper for Varisat
pub struct VarisatSatSolver {
    solver: Solver<'static>,
    variable_count: usize,
    clause_count: usize,
    last_result: Option<(SolverResultType, Duration)>,
}

impl VarisatSatSolver {
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            variable_count: 0,
            clause_count: 0,
            last_result: None,
        }
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

        let literals: Vec<Lit> = clause
            .literals
            .iter()
            .map(|&literal| {
                let var = literal.unsigned_abs() as usize;
                if var > self.variable_count {
                    self.variable_count = var;
                }
                Lit::from_dimacs(literal as isize)
            })
            .collect();

        self.solver.add_clause(&literals);
        self.clause_count += 1;
        Ok(())
    }

    pub fn reserve_variables(&mut self, count: usize) {
        self.variable_count = self.variable_count.max(count);
    }

    /// Solve the SAT problem. `Ok(None)` means unsatisfiable.
    pub fn solve(&mut self) -> Result<Option<SolverSolution>> {
        let start_time = Instant::now();
        let result = self
            .solver
            .solve()
            .map_err(|e| anyhow::anyhow!("Varisat error: {}", e))?;
        let solve_time = start_time.elapsed();

        if !result {
            self.last_result = Some((SolverResultType::Unsatisfiable, solve_time));
            return Ok(None);
        }

        self.last_result = Some((SolverResultType::Satisfiable, solve_time));
        let assignment = self.extract_assignment()?;
        Ok(Some(SolverSolution {
            assignment,
            solve_time,
        }))
    }

    /// Extract variable assignment from the model. Variables absent from the
    /// model are reported as false.
    fn extract_assignment(&self) -> Result<HashMap<i32, bool>> {
        let model = self
            .solver
            .model()
            .ok_or_else(|| anyhow::anyhow!("Varisat reported SAT without a model"))?;

        let mut assignment: HashMap<i32, bool> =
            (1..=self.variable_count as i32).map(|var| (var, false)).collect();
        for lit in model {
            let var = lit.var().to_dimacs() as i32;
            if var as usize <= self.variable_count {
                assignment.insert(var, lit.is_positive());
            }
        }
        Ok(assignment)
    }

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

    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    pub fn clause_count(&self) -> usize {
        self.clause_count
    }

    /// Varisat has no wall-clock limit; a configured timeout is ignored.
    pub fn configure(&mut self, options: &SolverOptions) {
        if let Some(timeout) = options.timeout {
            warn!(
                "Varisat does not support timeouts, ignoring the {}s limit",
                timeout.as_secs()
            );
        }
    }
}

impl Default for VarisatSatSolver {
    fn default() -> Self {
        Self::new()
    }
}
