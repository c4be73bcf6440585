//! Main CLI application for the knight's tour solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use knights_tour::{
    config::{CliOverrides, OutputFormat, Settings, SolverBackend},
    solve_tour,
    tour::{TourOutcome, TourProblem, TourSolution},
    utils::{ColorOutput, TourFormatter},
};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Exit status when no tour exists
const EXIT_UNSAT: u8 = 2;

#[derive(Parser)]
#[command(name = "knights_tour")]
#[command(about = "Knight's Tour SAT Solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a knight's tour
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        #[command(flatten)]
        board: BoardArgs,

        /// SAT backend (overrides config)
        #[arg(short, long, value_enum)]
        backend: Option<SolverBackend>,

        /// Solver timeout in seconds, 0 for none (overrides config)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Also write the solution to this file (overrides config)
        #[arg(short, long)]
        solution_file: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create example configuration files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Check that a saved solution is a knight's tour
    Verify {
        /// Solution file written by `solve --format json` or `--solution-file`
        solution: PathBuf,
    },

    /// Report what is known about a board without running the solver
    Analyze {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        #[command(flatten)]
        board: BoardArgs,
    },
}

/// Board and tour overrides shared by `solve` and `analyze`
#[derive(clap::Args, Debug, Default)]
struct BoardArgs {
    /// Number of rows
    #[arg(long)]
    rows: Option<usize>,

    /// Number of columns
    #[arg(long)]
    cols: Option<usize>,

    /// Row of the starting square
    #[arg(long = "start-row", visible_alias = "x")]
    start_row: Option<usize>,

    /// Column of the starting square
    #[arg(long = "start-col", visible_alias = "y")]
    start_col: Option<usize>,

    /// Require the last square to be a knight move from the first
    #[arg(long, conflicts_with = "open")]
    closed: bool,

    /// Allow the tour to end anywhere
    #[arg(long)]
    open: bool,
}

impl BoardArgs {
    fn overrides(&self) -> CliOverrides {
        let closed = match (self.closed, self.open) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        CliOverrides {
            rows: self.rows,
            cols: self.cols,
            start_row: self.start_row,
            start_col: self.start_col,
            closed,
            ..CliOverrides::default()
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Solve { verbose: true, .. });
    init_logging(verbose);

    match cli.command {
        Commands::Solve {
            config,
            board,
            backend,
            timeout,
            format,
            solution_file,
            verbose,
        } => {
            let overrides = CliOverrides {
                backend,
                timeout_seconds: timeout,
                format,
                solution_file,
                ..board.overrides()
            };
            solve_command(&config, &overrides, verbose)
        }
        Commands::Setup { directory, force } => {
            setup_command(&directory, force)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Verify { solution } => verify_command(&solution),
        Commands::Analyze { config, board } => {
            analyze_command(&config, &board.overrides())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };
    // Logs go to stderr; stdout is reserved for results
    if let Err(e) = simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialise logging: {}", e);
    }
}

/// Load the config file if present, otherwise defaults, then apply overrides.
/// Validation runs once, after the overrides are merged.
fn load_settings(config_path: &Path, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::read_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        info!("Config file {} not found, using defaults", config_path.display());
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

fn solve_command(config_path: &Path, overrides: &CliOverrides, verbose: bool) -> Result<ExitCode> {
    let settings = load_settings(config_path, overrides)?;

    if verbose {
        let problem = TourProblem::from_settings(&settings)?;
        eprintln!("{}", problem.estimate_solvability());
        eprintln!("{}", problem.encoding_statistics());
    }

    let outcome = solve_tour(&settings)?;
    print!("{}", render_outcome(&outcome, settings.output.format)?);

    match outcome {
        TourOutcome::Unsatisfiable => Ok(ExitCode::from(EXIT_UNSAT)),
        TourOutcome::Solved(solution) => {
            if let Some(path) = &settings.output.solution_file {
                solution
                    .save_to_file(path)
                    .context("Failed to save solution")?;
                info!("Solution saved to {}", path.display());
            }
            if verbose {
                eprintln!("{}", TourFormatter::format_summary(&solution));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Text printed to stdout for a search result
fn render_outcome(outcome: &TourOutcome, format: OutputFormat) -> Result<String> {
    match outcome {
        TourOutcome::Unsatisfiable => Ok("unsat\n".to_string()),
        TourOutcome::Solved(solution) => TourFormatter::format_solution(solution, format),
    }
}

fn setup_command(directory: &Path, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up configuration files..."));

    let config_dir = directory.join("config");
    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)
        .with_context(|| format!("Failed to create directory {}", examples_dir.display()))?;

    let mut closed_8x8 = Settings::default();
    closed_8x8.board.rows = 8;
    closed_8x8.board.cols = 8;
    closed_8x8.tour.closed = true;
    closed_8x8.solver.timeout_seconds = 600;

    let mut wide_open = Settings::default();
    wide_open.board.rows = 3;
    wide_open.board.cols = 7;
    wide_open.solver.backend = SolverBackend::Varisat;
    wide_open.output.format = OutputFormat::Coordinates;

    let files = [
        (config_dir.join("default.yaml"), Settings::default()),
        (examples_dir.join("closed_8x8.yaml"), closed_8x8),
        (examples_dir.join("open_3x7.yaml"), wide_open),
    ];

    for (path, settings) in &files {
        if path.exists() && !force {
            println!("Skipped: {} (already exists)", path.display());
            continue;
        }
        settings
            .to_file(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        println!("Created: {}", path.display());
    }

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Run: cargo run -- solve --config config/default.yaml");

    Ok(())
}

fn verify_command(solution_path: &Path) -> Result<ExitCode> {
    let solution = TourSolution::load_from_file(solution_path)?;
    let result = solution.verify();

    println!("{}", solution.parameters);
    println!("{}", result);

    if result.is_valid {
        println!("{}", ColorOutput::success("Tour is valid"));
        Ok(ExitCode::SUCCESS)
    } else {
        if let Some(error) = &result.error_message {
            warn!("{}", error);
        }
        println!("{}", ColorOutput::error("Tour is invalid"));
        Ok(ExitCode::FAILURE)
    }
}

fn analyze_command(config_path: &Path, overrides: &CliOverrides) -> Result<()> {
    let settings = load_settings(config_path, overrides)?;
    let problem = TourProblem::from_settings(&settings)?;
    let params = problem.params();

    println!("{}", ColorOutput::info(&format!("Analyzing {}", params)));
    println!("\nKnight moves per square:");
    print!(
        "{}",
        TourFormatter::format_degree_map(params.board(), problem.adjacency())
    );

    let isolated = problem.adjacency().isolated_cells();
    if !isolated.is_empty() && params.cell_count() > 1 {
        println!(
            "{}",
            ColorOutput::warning(&format!("Squares without any knight move: {:?}", isolated))
        );
    }

    println!("\n{}", problem.estimate_solvability());
    println!("{}", problem.estimate_complexity());
    println!("{}", problem.encoding_statistics());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from([
            "knights_tour",
            "solve",
            "--config",
            "test.yaml",
            "--rows",
            "6",
            "--x",
            "2",
            "--closed",
            "--backend",
            "varisat",
        ])
        .unwrap();

        match cli.command {
            Commands::Solve { board, backend, .. } => {
                let overrides = board.overrides();
                assert_eq!(overrides.rows, Some(6));
                assert_eq!(overrides.start_row, Some(2));
                assert_eq!(overrides.closed, Some(true));
                assert_eq!(backend, Some(SolverBackend::Varisat));
            }
            _ => panic!("expected solve"),
        }
    }

    #[test]
    fn test_closed_and_open_conflict() {
        let cli = Cli::try_parse_from(["knights_tour", "solve", "--closed", "--open"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_open_flag_overrides_config() {
        let args = BoardArgs {
            open: true,
            ..BoardArgs::default()
        };
        assert_eq!(args.overrides().closed, Some(false));
        assert_eq!(BoardArgs::default().overrides().closed, None);
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path(), false).unwrap();

        let default_path = temp_dir.path().join("config/default.yaml");
        assert!(default_path.exists());
        assert!(temp_dir.path().join("config/examples/closed_8x8.yaml").exists());

        let closed = Settings::from_file(&temp_dir.path().join("config/examples/closed_8x8.yaml")).unwrap();
        assert!(closed.tour.closed);
        assert_eq!(closed.board.rows, 8);
    }

    #[test]
    fn test_load_settings_applies_overrides() {
        let temp_dir = tempdir().unwrap();
        let overrides = CliOverrides {
            rows: Some(3),
            cols: Some(4),
            ..CliOverrides::default()
        };
        let settings = load_settings(&temp_dir.path().join("missing.yaml"), &overrides).unwrap();
        assert_eq!(settings.board.rows, 3);
        assert_eq!(settings.board.cols, 4);

        let bad = CliOverrides {
            start_row: Some(10),
            ..CliOverrides::default()
        };
        assert!(load_settings(&temp_dir.path().join("missing.yaml"), &bad).is_err());
    }

    #[test]
    fn test_unsat_exit_code() {
        let temp_dir = tempdir().unwrap();
        let overrides = CliOverrides {
            rows: Some(3),
            cols: Some(3),
            ..CliOverrides::default()
        };
        let code = solve_command(&temp_dir.path().join("missing.yaml"), &overrides, false).unwrap();
        assert_eq!(code, ExitCode::from(EXIT_UNSAT));
    }

    #[test]
    fn test_unsat_is_rendered_as_single_token() {
        let mut settings = Settings::default();
        settings.board.rows = 4;
        settings.board.cols = 4;
        settings.tour.closed = true;

        let outcome = solve_tour(&settings).unwrap();
        for format in [OutputFormat::Grid, OutputFormat::Json] {
            assert_eq!(render_outcome(&outcome, format).unwrap(), "unsat\n");
        }
    }

    #[test]
    fn test_solved_grid_rendering() {
        let mut settings = Settings::default();
        settings.board.rows = 3;
        settings.board.cols = 4;

        let rendered = render_outcome(&solve_tour(&settings).unwrap(), OutputFormat::Grid).unwrap();
        assert_eq!(rendered.lines().count(), 3);
        assert!(rendered.starts_with(" 0 "));
    }

    #[test]
    fn test_overrides_apply_before_validation() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("small.yaml");
        std::fs::write(&config_path, "board:\n  rows: 3\n  cols: 3\ntour:\n  start_row: 5\n").unwrap();

        assert!(load_settings(&config_path, &CliOverrides::default()).is_err());

        let overrides = CliOverrides {
            rows: Some(8),
            cols: Some(8),
            ..CliOverrides::default()
        };
        let settings = load_settings(&config_path, &overrides).unwrap();
        assert_eq!(settings.board.rows, 8);
        assert_eq!(settings.tour.start_row, 5);
    }

    #[test]
    fn test_solve_then_verify() {
        let temp_dir = tempdir().unwrap();
        let solution_path = temp_dir.path().join("tour.json");
        let overrides = CliOverrides {
            rows: Some(3),
            cols: Some(4),
            solution_file: Some(solution_path.clone()),
            ..CliOverrides::default()
        };
        let code = solve_command(&temp_dir.path().join("missing.yaml"), &overrides, false).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(verify_command(&solution_path).unwrap(), ExitCode::SUCCESS);
    }
}
