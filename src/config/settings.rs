//! Configuration settings for the knight's tour solver

use crate::board::{Cell, TourParameters};
use crate::error::TourError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub board: BoardConfig,
    pub tour: TourConfig,
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    pub start_row: usize,
    pub start_col: usize,
    pub closed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Wall-clock limit for one solve; 0 means no limit
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    #[default]
    Cadical,
    Varisat,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Where to write the solution as JSON, if anywhere
    pub solution_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Step numbers laid out as the board
    #[default]
    Grid,
    /// Grid with row and column labels
    Coordinates,
    /// The solution record as JSON
    Json,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self { rows: 5, cols: 5 }
    }
}

impl Settings {
    /// Load and validate settings from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings = Self::read_file(path)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse a YAML file without validating it. Callers that merge overrides
    /// afterwards must call [`Settings::validate`] themselves.
    pub fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        self.tour_parameters()?;
        Ok(())
    }

    /// Board, start and tour kind as validated parameters
    pub fn tour_parameters(&self) -> Result<TourParameters, TourError> {
        TourParameters::new(
            self.board.rows,
            self.board.cols,
            Cell::new(self.tour.start_row, self.tour.start_col),
            self.tour.closed,
        )
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(rows) = cli_overrides.rows {
            self.board.rows = rows;
        }
        if let Some(cols) = cli_overrides.cols {
            self.board.cols = cols;
        }
        if let Some(start_row) = cli_overrides.start_row {
            self.tour.start_row = start_row;
        }
        if let Some(start_col) = cli_overrides.start_col {
            self.tour.start_col = start_col;
        }
        if let Some(closed) = cli_overrides.closed {
            self.tour.closed = closed;
        }
        if let Some(backend) = cli_overrides.backend {
            self.solver.backend = backend;
        }
        if let Some(timeout) = cli_overrides.timeout_seconds {
            self.solver.timeout_seconds = timeout;
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
        if let Some(ref solution_file) = cli_overrides.solution_file {
            self.output.solution_file = Some(solution_file.clone());
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub start_row: Option<usize>,
    pub start_col: Option<usize>,
    pub closed: Option<bool>,
    pub backend: Option<SolverBackend>,
    pub timeout_seconds: Option<u64>,
    pub format: Option<OutputFormat>,
    pub solution_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.board.rows, 5);
        assert_eq!(settings.board.cols, 5);
        assert_eq!(settings.tour.start_row, 0);
        assert!(!settings.tour.closed);
        assert_eq!(settings.solver.backend, SolverBackend::Cadical);
        assert_eq!(settings.solver.timeout_seconds, 0);
        assert_eq!(settings.output.format, OutputFormat::Grid);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("tour.yaml");

        let mut settings = Settings::default();
        settings.board.rows = 6;
        settings.tour.closed = true;
        settings.solver.backend = SolverBackend::Varisat;
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.yaml");
        std::fs::write(&path, "board:\n  rows: 3\ntour:\n  closed: true\n").unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.board.rows, 3);
        assert_eq!(settings.board.cols, 5);
        assert!(settings.tour.closed);
        assert_eq!(settings.solver, SolverConfig::default());
    }

    #[test]
    fn test_invalid_start_rejected_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "board:\n  rows: 3\n  cols: 3\ntour:\n  start_row: 3\n").unwrap();

        let err = Settings::from_file(&path).unwrap_err();
        let tour_error = err.downcast_ref::<TourError>().unwrap();
        assert!(matches!(
            tour_error,
            TourError::InvalidConfiguration { field: "start_row", .. }
        ));
    }

    #[test]
    fn test_overrides_can_repair_file_before_validation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("small.yaml");
        std::fs::write(&path, "board:\n  rows: 3\n  cols: 3\ntour:\n  start_row: 5\n").unwrap();

        let mut settings = Settings::read_file(&path).unwrap();
        assert!(settings.validate().is_err());

        settings.merge_with_cli(&CliOverrides {
            rows: Some(8),
            ..CliOverrides::default()
        });
        assert!(settings.validate().is_ok());
        assert_eq!(settings.tour.start_row, 5);
    }

    #[test]
    fn test_zero_rows_invalid() {
        let mut settings = Settings::default();
        settings.board.rows = 0;
        assert!(matches!(
            settings.tour_parameters(),
            Err(TourError::InvalidConfiguration { field: "rows", .. })
        ));
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempdir().unwrap();
        assert!(Settings::from_file(&dir.path().join("absent.yaml")).is_err());
    }

    #[test]
    fn test_merge_with_cli() {
        let mut settings = Settings::default();
        let overrides = CliOverrides {
            rows: Some(8),
            cols: Some(8),
            start_col: Some(2),
            closed: Some(true),
            timeout_seconds: Some(30),
            format: Some(OutputFormat::Json),
            solution_file: Some(PathBuf::from("out/tour.json")),
            ..CliOverrides::default()
        };
        settings.merge_with_cli(&overrides);

        assert_eq!(settings.board.rows, 8);
        assert_eq!(settings.board.cols, 8);
        assert_eq!(settings.tour.start_row, 0);
        assert_eq!(settings.tour.start_col, 2);
        assert!(settings.tour.closed);
        assert_eq!(settings.solver.backend, SolverBackend::Cadical);
        assert_eq!(settings.solver.timeout_seconds, 30);
        assert_eq!(settings.output.format, OutputFormat::Json);
        assert_eq!(settings.output.solution_file, Some(PathBuf::from("out/tour.json")));
    }
}
