//! Display and output formatting utilities

use crate::board::{AdjacencyRelation, Board};
use crate::config::OutputFormat;
use crate::tour::TourSolution;
use anyhow::{Context, Result};
use std::path::Path;

/// Format tours for display
pub struct TourFormatter;

impl TourFormatter {
    /// One line per board row, every step right-aligned in two characters
    /// and separated by single spaces
    pub fn format_grid(grid: &[Vec<usize>]) -> String {
        let mut output = String::new();
        for row in grid {
            let line: Vec<String> = row.iter().map(|step| format!("{:>2}", step)).collect();
            output.push_str(&line.join(" "));
            output.push('\n');
        }
        output
    }

    /// Grid with row and column labels
    pub fn format_grid_with_coords(grid: &[Vec<usize>]) -> String {
        let cols = grid.first().map_or(0, Vec::len);
        let mut output = String::new();

        output.push_str("   ");
        for col in 0..cols {
            output.push_str(&format!(" {:>2}", col));
        }
        output.push('\n');

        for (row, steps) in grid.iter().enumerate() {
            output.push_str(&format!("{:>2} ", row));
            for step in steps {
                output.push_str(&format!(" {:>2}", step));
            }
            output.push('\n');
        }
        output
    }

    /// Render a solution in the requested format
    pub fn format_solution(solution: &TourSolution, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Grid => Ok(Self::format_grid(&solution.grid)),
            OutputFormat::Coordinates => Ok(Self::format_grid_with_coords(&solution.grid)),
            OutputFormat::Json => {
                let mut json = solution.to_json().context("Failed to serialize solution")?;
                json.push('\n');
                Ok(json)
            }
        }
    }

    /// Short description of a solution for the console
    pub fn format_summary(solution: &TourSolution) -> String {
        let mut output = String::new();
        output.push_str(&format!("=== Tour {} ===\n", solution.metadata.id));
        output.push_str(&format!("Parameters: {}\n", solution.parameters));
        output.push_str(&format!("Squares: {}\n", solution.metadata.cell_count));
        output.push_str(&format!("Solve Time: {:.3}s\n", solution.solve_time.as_secs_f64()));
        if !solution.parameters.is_closed() {
            output.push_str(&format!(
                "Re-entrant: {}\n",
                if solution.metadata.reentrant { "yes" } else { "no" }
            ));
        }
        output
    }

    /// Number of knight moves available from every square
    pub fn format_degree_map(board: &Board, adjacency: &AdjacencyRelation) -> String {
        let grid: Vec<Vec<usize>> = (0..board.rows())
            .map(|row| {
                (0..board.cols())
                    .map(|col| adjacency.degree(row * board.cols() + col))
                    .collect()
            })
            .collect();
        Self::format_grid(&grid)
    }

    /// Save a solution to a file in the requested format
    pub fn save_solution<P: AsRef<Path>>(
        solution: &TourSolution,
        path: P,
        format: OutputFormat,
    ) -> Result<()> {
        let path = path.as_ref();
        if format == OutputFormat::Json {
            return solution.save_to_file(path);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = format!(
            "{}\n{}",
            Self::format_summary(solution),
            Self::format_solution(solution, format)?
        );
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TourParameters;
    use crate::tour::TourOrder;
    use std::time::Duration;
    use tempfile::tempdir;

    fn sample_solution() -> TourSolution {
        let params = TourParameters::open(3, 4).unwrap();
        let order: TourOrder =
            serde_json::from_str("[0, 6, 8, 1, 7, 9, 2, 11, 5, 3, 10, 4]").unwrap();
        TourSolution::new(params, order, false, Duration::from_millis(5))
    }

    #[test]
    fn test_grid_formatting() {
        let grid = vec![vec![0, 11, 6], vec![3, 10, 1]];
        assert_eq!(TourFormatter::format_grid(&grid), " 0 11  6\n 3 10  1\n");
    }

    #[test]
    fn test_grid_has_no_trailing_spaces() {
        let rendered = TourFormatter::format_grid(&sample_solution().grid);
        assert_eq!(rendered.lines().count(), 3);
        for line in rendered.lines() {
            assert_eq!(line.len(), 4 * 2 + 3);
            assert!(!line.ends_with(' '));
        }
        assert!(rendered.starts_with(" 0 "));
    }

    #[test]
    fn test_grid_with_coords() {
        let with_coords = TourFormatter::format_grid_with_coords(&[vec![0, 1], vec![2, 3]]);
        assert_eq!(with_coords, "     0  1\n 0   0  1\n 1   2  3\n");
    }

    #[test]
    fn test_degree_map() {
        let board = Board::new(3, 3);
        let adjacency = AdjacencyRelation::build(&board);
        assert_eq!(
            TourFormatter::format_degree_map(&board, &adjacency),
            " 2  2  2\n 2  0  2\n 2  2  2\n"
        );
    }

    #[test]
    fn test_format_solution_json() {
        let json = TourFormatter::format_solution(&sample_solution(), OutputFormat::Json).unwrap();
        let parsed = TourSolution::from_json(&json).unwrap();
        assert_eq!(parsed.order, sample_solution().order);
    }

    #[test]
    fn test_save_solution_text_and_json() {
        let dir = tempdir().unwrap();
        let solution = sample_solution();

        let text_path = dir.path().join("tour.txt");
        TourFormatter::save_solution(&solution, &text_path, OutputFormat::Grid).unwrap();
        let text = std::fs::read_to_string(&text_path).unwrap();
        assert!(text.contains("Re-entrant: no"));
        assert!(text.contains(" 0 "));

        let json_path = dir.path().join("json").join("tour.json");
        TourFormatter::save_solution(&solution, &json_path, OutputFormat::Json).unwrap();
        assert!(TourSolution::load_from_file(&json_path).is_ok());
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        assert!(colored.contains("test"));
        assert!(ColorOutput::success("OK").contains("OK"));
    }
}
