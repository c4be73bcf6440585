//! SAT encoding and solving components for the knight's tour

pub mod cnf;
pub mod constraints;
pub mod encoder;
pub mod gateway;
pub mod solver;
pub mod solver_factory;
pub mod variables;
pub mod varisat_solver;
pub mod word;

pub use cnf::{BitBlaster, Clause, CnfFormula};
pub use constraints::{Assignment, Constraint, ConstraintSet, WordTerm};
pub use encoder::TourEncoder;
pub use gateway::{SatGateway, SolveOutcome, SolverGateway};
pub use solver::{SatSolver, SolverOptions, SolverSolution};
pub use solver_factory::UnifiedSatSolver;
pub use variables::VariableManager;
pub use word::StateWord;
