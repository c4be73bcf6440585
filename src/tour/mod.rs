//! Knight's tour problem definition and solution handling

pub mod decoder;
pub mod problem;
pub mod solution;
pub mod validator;

pub use decoder::{decode, TourOrder};
pub use problem::{TourOutcome, TourProblem};
pub use solution::TourSolution;
pub use validator::TourValidator;
