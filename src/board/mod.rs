//! Board model and knight-move adjacency

pub mod adjacency;
pub mod geometry;
pub mod params;

pub use adjacency::{build_adjacency, AdjacencyRelation, KNIGHT_OFFSETS};
pub use geometry::{Board, Cell, CellIndex};
pub use params::TourParameters;
