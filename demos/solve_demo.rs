//! Fill a small crossword in memory and print the result
//!
//! Run with `cargo run --example solve_demo`.

use crossword_csp::crossword::{parse_structure_from_string, parse_words_from_string};
use crossword_csp::utils::SolutionFormatter;
use crossword_csp::{CrosswordProblem, Settings};

fn main() -> anyhow::Result<()> {
    println!("=== Crossword CSP Demonstration ===\n");

    // Four slots around a blocked centre
    let crossword = parse_structure_from_string("____\n_##_\n____\n")?;
    let words = parse_words_from_string("cat\ncold\ndoe\ntree\ndog\ncats\nbird\nten\n");

    let problem = CrosswordProblem::from_parts(crossword, words, Settings::default());
    println!("{}", problem.analyze());

    let outcome = problem.solve()?;
    match outcome.solution {
        Some(solution) => {
            print!("{}", SolutionFormatter::format_grid(problem.crossword(), &solution));
            println!();
            print!("{}", SolutionFormatter::format_entries(&solution));
        }
        None => println!("No solution."),
    }

    println!("\n{}", outcome.statistics);
    Ok(())
}
