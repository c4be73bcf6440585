//! Solver gateway: decides satisfiability of a constraint set

use super::cnf::BitBlaster;
use super::constraints::{Assignment, ConstraintSet};
use super::solver::SolverOptions;
use super::solver_factory::UnifiedSatSolver;
use super::word::StateWord;
use crate::config::SolverBackend;
use crate::error::TourError;
use log::{debug, info};

/// Answer of a satisfiability check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Satisfiable(Assignment),
    Unsatisfiable,
}

/// Anything that can decide a [`ConstraintSet`]
pub trait SolverGateway {
    /// Decide `set`. A satisfying assignment has one word per cell, each of
    /// width `set.word_width()`. Failure to reach a verdict is an error, never
    /// `Unsatisfiable`.
    fn check(&mut self, set: &ConstraintSet) -> Result<SolveOutcome, TourError>;
}

/// Gateway that bit-blasts to CNF and runs an off-the-shelf SAT solver
#[derive(Debug, Clone)]
pub struct SatGateway {
    backend: SolverBackend,
    options: SolverOptions,
}

impl SatGateway {
    pub fn new(backend: SolverBackend, options: SolverOptions) -> Self {
        Self { backend, options }
    }

    pub fn backend(&self) -> SolverBackend {
        self.backend
    }
}

impl Default for SatGateway {
    fn default() -> Self {
        Self::new(SolverBackend::default(), SolverOptions::default())
    }
}

impl SolverGateway for SatGateway {
    fn check(&mut self, set: &ConstraintSet) -> Result<SolveOutcome, TourError> {
        let formula =
            BitBlaster::blast(set).map_err(|e| TourError::SolverFailure(format!("{:#}", e)))?;
        debug!("{}", formula);

        if formula.is_contradiction() {
            info!("Encoding contains an empty clause, skipping the solver");
            return Ok(SolveOutcome::Unsatisfiable);
        }

        let mut solver = UnifiedSatSolver::new(self.backend);
        solver.configure(&self.options);
        solver.reserve_variables(formula.variable_count());
        solver
            .add_clauses(formula.clauses())
            .map_err(|e| TourError::SolverFailure(format!("{:#}", e)))?;

        info!(
            "Solving with {:?}: {} variables, {} clauses",
            self.backend,
            formula.variable_count(),
            formula.clause_count()
        );
        let solution = solver
            .solve()
            .map_err(|e| TourError::SolverFailure(format!("{:#}", e)))?;
        debug!("{}", solver.statistics());

        let Some(solution) = solution else {
            return Ok(SolveOutcome::Unsatisfiable);
        };
        info!("Solver finished in {:.3}s", solution.solve_time.as_secs_f64());

        let width = set.word_width();
        let values = (0..set.cell_count())
            .map(|cell| {
                let mut word = StateWord::zero(width);
                for bit in 0..width {
                    let var = formula
                        .state_variable(cell, bit)
                        .map_err(|e| TourError::SolverFailure(format!("{:#}", e)))?;
                    if solution.assignment.get(&var).copied().unwrap_or(false) {
                        word.set_bit(bit, true);
                    }
                }
                Ok(word)
            })
            .collect::<Result<Vec<_>, TourError>>()?;

        Ok(SolveOutcome::Satisfiable(Assignment::new(width, values)))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Gateways for exercising callers without a SAT solver

    use super::*;
    use crate::sat::constraints::Constraint;

    /// Exhaustive search over one-hot assignments. Only usable on tiny boards.
    pub(crate) struct ExhaustiveGateway;

    impl ExhaustiveGateway {
        fn search(
            cell: usize,
            values: &mut [StateWord],
            used: &mut [bool],
            checks: &[Vec<&Constraint>],
        ) -> bool {
            let n = used.len();
            if cell == n {
                return true;
            }
            for step in 0..n {
                if used[step] {
                    continue;
                }
                used[step] = true;
                values[cell] = StateWord::one_hot(n, step);

                let assignment = Assignment::new(n, values.to_vec());
                if checks[cell].iter().all(|c| c.holds(&assignment))
                    && Self::search(cell + 1, values, used, checks)
                {
                    return true;
                }

                used[step] = false;
                values[cell] = StateWord::zero(n);
            }
            false
        }
    }

    impl SolverGateway for ExhaustiveGateway {
        fn check(&mut self, set: &ConstraintSet) -> Result<SolveOutcome, TourError> {
            let n = set.cell_count();
            assert!(n <= 9, "exhaustive search is limited to tiny boards");

            // Each constraint is checked once the highest cell it reads has a value
            let mut checks: Vec<Vec<&Constraint>> = vec![Vec::new(); n];
            for constraint in set {
                match constraint.cells().into_iter().max() {
                    Some(last) => checks[last].push(constraint),
                    None => {
                        if !constraint.holds(&Assignment::new(n, vec![StateWord::zero(n); n])) {
                            return Ok(SolveOutcome::Unsatisfiable);
                        }
                    }
                }
            }

            let mut values = vec![StateWord::zero(n); n];
            let mut used = vec![false; n];
            if Self::search(0, &mut values, &mut used, &checks) {
                Ok(SolveOutcome::Satisfiable(Assignment::new(n, values)))
            } else {
                Ok(SolveOutcome::Unsatisfiable)
            }
        }
    }

    /// Returns the same outcome for every query
    pub(crate) struct CannedGateway(pub SolveOutcome);

    impl SolverGateway for CannedGateway {
        fn check(&mut self, _set: &ConstraintSet) -> Result<SolveOutcome, TourError> {
            Ok(self.0.clone())
        }
    }

    /// Never reaches a verdict
    pub(crate) struct FailingGateway;

    impl SolverGateway for FailingGateway {
        fn check(&mut self, _set: &ConstraintSet) -> Result<SolveOutcome, TourError> {
            Err(TourError::SolverFailure("solver crashed".to_string()))
        }
    }
}
