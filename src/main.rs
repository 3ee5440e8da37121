//! Main CLI application for the crossword solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossword_csp::{
    config::{CliOverrides, OutputFormat, Settings},
    crossword::{create_example_puzzles, io::list_structure_files, load_structure_from_file, load_words_from_file},
    csp::Termination,
    generate::{CrosswordProblem, Solution, SolutionValidator, SolveOutcome},
    utils::{logger, render, ColorOutput, SolutionFormatter},
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "crossword_csp")]
#[command(about = "Crossword CSP Solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill a crossword structure from a word list
    Solve {
        /// Structure file ('_' open, anything else blocked)
        structure: PathBuf,

        /// Word list, one word per line
        words: PathBuf,

        /// Write the filled grid here
        output: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Search node budget (overrides config)
        #[arg(long)]
        max_nodes: Option<u64>,

        /// Search time budget in seconds (overrides config)
        #[arg(long)]
        timeout_seconds: Option<u64>,

        /// Skip AC-3 before searching
        #[arg(long)]
        no_arc_consistency: bool,

        /// Print solver statistics
        #[arg(short, long)]
        stats: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Analyze a puzzle and word list without searching
    Analyze {
        /// Structure file
        #[arg(short, long)]
        structure: PathBuf,

        /// Word list
        #[arg(short, long)]
        words: PathBuf,
    },

    /// Validate a JSON solution against a structure
    Validate {
        /// Structure file
        #[arg(short, long)]
        structure: PathBuf,

        /// Solution file written with `--format json`
        #[arg(long)]
        solution: PathBuf,
    },

    /// Solve every structure in a directory in parallel
    Batch {
        /// Directory of structure files (*.txt)
        #[arg(short, long)]
        structures: PathBuf,

        /// Word list shared by all structures
        #[arg(short, long)]
        words: PathBuf,

        /// Directory to write filled grids to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create example configuration and puzzle files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            structure,
            words,
            output,
            config,
            format,
            max_nodes,
            timeout_seconds,
            no_arc_consistency,
            stats,
            verbose,
        } => {
            logger::init(verbose);
            let overrides = CliOverrides {
                max_nodes,
                timeout_seconds,
                format,
                no_arc_consistency,
                show_statistics: stats,
            };
            solve_command(structure, words, output, config, overrides)
        }
        Commands::Analyze { structure, words } => {
            logger::init(false);
            analyze_command(structure, words)
        }
        Commands::Validate { structure, solution } => {
            logger::init(false);
            validate_command(structure, solution)
        }
        Commands::Batch {
            structures,
            words,
            output_dir,
            config,
            verbose,
        } => {
            logger::init(verbose);
            batch_command(structures, words, output_dir, config)
        }
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn load_settings(config_path: Option<&Path>, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = Settings::from_file_or_default(config_path)
        .context("Failed to load configuration")?;
    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

fn solve_command(
    structure_path: PathBuf,
    words_path: PathBuf,
    output_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    overrides: CliOverrides,
) -> Result<()> {
    let settings = load_settings(config_path.as_deref(), &overrides)?;
    let format_overridden = overrides.format.is_some();

    let problem = CrosswordProblem::new(&structure_path, &words_path, settings)
        .context("Failed to create crossword problem")?;
    let settings = problem.settings();
    let outcome = problem.solve().context("Failed to solve crossword")?;

    let Some(solution) = outcome.solution else {
        println!("No solution.");
        if outcome.statistics.termination != Termination::Unsatisfiable {
            println!("{}", ColorOutput::warning(&format!("Search stopped: {}", outcome.statistics.termination)));
        }
        if settings.output.show_statistics {
            println!("\n{}", outcome.statistics);
        }
        return Ok(());
    };

    print!(
        "{}",
        SolutionFormatter::format_solution(problem.crossword(), &solution, settings.output.show_statistics)
    );

    if let Some(path) = output_path {
        // A .png output path asks for an image unless --format says otherwise
        let format = if !format_overridden && render::is_png_path(&path) {
            OutputFormat::Png
        } else {
            settings.output.format
        };
        SolutionFormatter::save_solution(problem.crossword(), &solution, &path, format)
            .context("Failed to save solution")?;
        println!("{}", ColorOutput::success(&format!("Solution saved to {}", path.display())));
    }

    Ok(())
}

fn analyze_command(structure_path: PathBuf, words_path: PathBuf) -> Result<()> {
    let problem = CrosswordProblem::new(&structure_path, &words_path, Settings::default())
        .context("Failed to create problem for analysis")?;

    println!("Structure ({}x{}):", problem.crossword().width(), problem.crossword().height());
    print!("{}", crossword_csp::crossword::io::structure_to_string(problem.crossword()));
    println!();

    println!("Slots:");
    for (id, variable) in problem.crossword().variables().iter().enumerate() {
        println!("  {:3}. {} ({} crossings)", id, variable, problem.crossword().degree(id));
    }
    println!();

    println!("{}", problem.analyze());

    Ok(())
}

fn validate_command(structure_path: PathBuf, solution_path: PathBuf) -> Result<()> {
    let crossword = load_structure_from_file(&structure_path)
        .with_context(|| format!("Failed to load structure from {}", structure_path.display()))?;
    let solution = Solution::load_from_file(&solution_path)
        .with_context(|| format!("Failed to load solution from {}", solution_path.display()))?;

    let result = SolutionValidator::new().validate_solution(&crossword, &solution);
    println!("{}", result);

    if result.is_valid {
        print!("{}", SolutionFormatter::format_grid(&crossword, &solution));
        println!("{}", ColorOutput::success("Solution is valid!"));
    } else {
        println!("{}", ColorOutput::error("Solution is invalid"));
        anyhow::bail!("Solution in {} is invalid", solution_path.display());
    }

    Ok(())
}

/// One row of the batch summary
struct BatchResult {
    name: String,
    slots: usize,
    outcome: Result<SolveOutcome>,
}

fn batch_command(
    structures_dir: PathBuf,
    words_path: PathBuf,
    output_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let settings = load_settings(config_path.as_deref(), &CliOverrides::default())?;
    let words = load_words_from_file(&words_path)
        .with_context(|| format!("Failed to load words from {}", words_path.display()))?;
    let files = list_structure_files(&structures_dir)?;

    if files.is_empty() {
        println!("{}", ColorOutput::warning(&format!("No structures found in {}", structures_dir.display())));
        return Ok(());
    }

    println!("{}", ColorOutput::info(&format!("Solving {} structures...", files.len())));
    let start_time = Instant::now();

    let results: Vec<BatchResult> = files
        .par_iter()
        .map(|(name, path)| {
            let crossword = match load_structure_from_file(path) {
                Ok(crossword) => crossword,
                Err(e) => {
                    return BatchResult {
                        name: name.clone(),
                        slots: 0,
                        outcome: Err(e),
                    }
                }
            };
            let slots = crossword.variable_count();
            let problem = CrosswordProblem::from_parts(crossword, words.clone(), settings.clone());

            let outcome = problem.solve().and_then(|outcome| {
                if let (Some(solution), Some(dir)) = (&outcome.solution, &output_dir) {
                    let extension = match settings.output.format {
                        OutputFormat::Json => "json",
                        OutputFormat::Png => "png",
                        OutputFormat::Text | OutputFormat::Visual => "txt",
                    };
                    let path = dir.join(format!("{}.{}", name, extension));
                    SolutionFormatter::save_solution(problem.crossword(), solution, path, settings.output.format)?;
                }
                Ok(outcome)
            });

            BatchResult {
                name: name.clone(),
                slots,
                outcome,
            }
        })
        .collect();

    println!("\n{}", format_batch_summary(&results));

    let solved = results
        .iter()
        .filter(|r| r.outcome.as_ref().is_ok_and(|o| o.solution.is_some()))
        .count();
    println!(
        "{}",
        ColorOutput::success(&format!(
            "Solved {}/{} structures in {:.3}s",
            solved,
            results.len(),
            start_time.elapsed().as_secs_f64()
        ))
    );

    if let Some(dir) = output_dir {
        println!("Solutions saved to {}", dir.display());
    }

    Ok(())
}

fn format_batch_summary(results: &[BatchResult]) -> String {
    let mut output = String::new();

    output.push_str("Batch Summary:\n");
    output.push_str("Name                 Slots  Result           Nodes      Time\n");
    output.push_str("-------------------  -----  ---------------  ---------  --------\n");

    for result in results {
        match &result.outcome {
            Ok(outcome) => {
                let statistics = &outcome.statistics;
                output.push_str(&format!(
                    "{:19}  {:5}  {:15}  {:9}  {:7.3}s\n",
                    result.name,
                    result.slots,
                    statistics.termination.to_string(),
                    statistics.search.nodes,
                    statistics.elapsed.as_secs_f64()
                ));
            }
            Err(e) => {
                output.push_str(&format!("{:19}  {:5}  error: {:#}\n", result.name, result.slots, e));
            }
        }
    }

    let solved: Vec<_> = results
        .iter()
        .filter_map(|r| r.outcome.as_ref().ok()?.solution.as_ref().map(|s| (&r.name, s.summary())))
        .collect();
    if !solved.is_empty() {
        output.push_str("\nSolutions:\n");
        for (name, summary) in solved {
            output.push_str(&format!("  {:19}  {}\n", name, summary));
        }
    }

    output
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input");
    let output_dir = directory.join("output");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    // A configuration with search budgets for large grids
    let mut bounded = Settings::default();
    bounded.solver.max_nodes = Some(1_000_000);
    bounded.solver.timeout_seconds = Some(60);
    bounded.output.format = OutputFormat::Visual;
    bounded.output.show_statistics = true;
    bounded.to_file(config_dir.join("bounded.yaml"))?;

    create_example_puzzles(&input_dir).context("Failed to create example puzzles")?;
    println!("Created example puzzles in: {}", input_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Add structures to {}", input_dir.join("structures").display());
    println!(
        "2. Run: cargo run -- solve {} {}",
        input_dir.join("structures/frame.txt").display(),
        input_dir.join("words/small.txt").display()
    );

    Ok(())
}
