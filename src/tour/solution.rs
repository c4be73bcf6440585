//! Solution representation for knight's tour problems

use super::decoder::TourOrder;
use super::validator::TourValidator;
use crate::board::{CellIndex, TourParameters};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// A solved tour together with the parameters it was solved for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourSolution {
    pub parameters: TourParameters,
    /// `order[t]` is the cell visited at step `t`
    pub order: TourOrder,
    /// Step number of every cell, row by row
    pub grid: Vec<Vec<usize>>,
    /// Time taken to find this solution
    #[serde(skip)]
    pub solve_time: Duration,
    pub metadata: SolutionMetadata,
}

/// Metadata about a solution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionMetadata {
    /// Identifier derived from the visit order
    pub id: String,
    pub cell_count: usize,
    /// Whether the last square is a knight move from the first.
    /// Always true for closed tours; open tours are sometimes re-entrant by luck.
    pub reentrant: bool,
    pub solve_time_ms: u64,
}

impl TourSolution {
    pub fn new(parameters: TourParameters, order: TourOrder, reentrant: bool, solve_time: Duration) -> Self {
        let grid = order.step_grid(parameters.cols());
        let metadata = SolutionMetadata {
            id: SolutionMetadata::generate_id(&parameters, order.as_slice()),
            cell_count: order.len(),
            reentrant,
            solve_time_ms: solve_time.as_millis() as u64,
        };

        Self {
            parameters,
            order,
            grid,
            solve_time,
            metadata,
        }
    }

    pub fn order(&self) -> &[CellIndex] {
        self.order.as_slice()
    }

    /// Step at which the square at (`row`, `col`) is visited
    pub fn step_at(&self, row: usize, col: usize) -> Option<usize> {
        self.grid.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json().context("Failed to serialize solution")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write solution file: {}", path.display()))?;
        Ok(())
    }

    /// Load from file. The stored parameters are checked again, since the
    /// file may have been edited by hand.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read solution file: {}", path.display()))?;
        let solution = Self::from_json(&content)
            .with_context(|| format!("Failed to parse solution file: {}", path.display()))?;

        let p = solution.parameters;
        TourParameters::new(p.rows(), p.cols(), p.start(), p.is_closed())
            .with_context(|| format!("Invalid parameters in {}", path.display()))?;
        Ok(solution)
    }

    /// Validate the order as a tour and check the stored grid agrees with it
    pub fn verify(&self) -> super::validator::ValidationResult {
        let mut result = TourValidator::new(self.parameters).validate(self.order.as_slice());
        if result.is_valid && self.grid != self.order.step_grid(self.parameters.cols()) {
            result.is_valid = false;
            result.error_message = Some("step grid does not match the visit order".to_string());
        }
        result
    }
}

impl SolutionMetadata {
    /// Generate an identifier from the board and the visit order
    fn generate_id(parameters: &TourParameters, order: &[CellIndex]) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        parameters.rows().hash(&mut hasher);
        parameters.cols().hash(&mut hasher);
        order.hash(&mut hasher);
        format!("tour_{:x}", hasher.finish())
    }
}
