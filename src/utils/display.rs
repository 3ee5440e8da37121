//! Display and output formatting utilities

use super::render;
use crate::config::OutputFormat;
use crate::crossword::Crossword;
use crate::generate::Solution;
use anyhow::{Context, Result};
use std::path::Path;

/// Glyph drawn for blocked cells
pub const BLOCKED_CELL: char = '█';

/// Format solutions for display
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// Render the filled grid: letters in open cells, a space for open cells
    /// no slot covers, and a block for everything else
    pub fn format_grid(crossword: &Crossword, solution: &Solution) -> String {
        let letters = solution.letter_grid();
        let mut output = String::with_capacity(crossword.height() * (crossword.width() * 3 + 1));

        for row in 0..crossword.height() {
            for col in 0..crossword.width() {
                if crossword.is_open(row, col) {
                    output.push(letters.get(row).and_then(|r| r.get(col).copied()).flatten().unwrap_or(' '));
                } else {
                    output.push(BLOCKED_CELL);
                }
            }
            output.push('\n');
        }

        output
    }

    /// Render the filled grid with row and column numbers
    pub fn format_grid_with_coords(crossword: &Crossword, solution: &Solution) -> String {
        let letters = solution.letter_grid();
        let mut output = String::new();

        // Header with column numbers
        output.push_str("   ");
        for x in 0..crossword.width() {
            output.push_str(&format!("{:2}", x % 10));
        }
        output.push('\n');

        // Rows with row numbers
        for y in 0..crossword.height() {
            output.push_str(&format!("{:2} ", y));
            for x in 0..crossword.width() {
                if crossword.is_open(y, x) {
                    let letter = letters.get(y).and_then(|r| r.get(x).copied()).flatten().unwrap_or('·');
                    output.push(' ');
                    output.push(letter);
                } else {
                    output.push(BLOCKED_CELL);
                    output.push(BLOCKED_CELL);
                }
            }
            output.push('\n');
        }

        output
    }

    /// List every slot with its word
    pub fn format_entries(solution: &Solution) -> String {
        let mut output = String::new();

        for (i, entry) in solution.entries.iter().enumerate() {
            output.push_str(&format!("{:3}. {:<20} {}\n", i + 1, entry.variable.to_string(), entry.word));
        }

        output
    }

    /// Format a single solution for console output
    pub fn format_solution(crossword: &Crossword, solution: &Solution, show_statistics: bool) -> String {
        let mut output = Self::format_grid(crossword, solution);

        if show_statistics {
            output.push('\n');
            output.push_str(&format!("Solution {}\n", solution.metadata.id));
            output.push_str(&format!(
                "Words: {} ({} letters, {} distinct)\n",
                solution.metadata.word_count, solution.metadata.letter_count, solution.metadata.distinct_letters
            ));
            if let Some(statistics) = &solution.statistics {
                output.push_str(&statistics.to_string());
                output.push('\n');
            }
        }

        output
    }

    /// Save a solution to `path` in the given format
    pub fn save_solution<P: AsRef<Path>>(
        crossword: &Crossword,
        solution: &Solution,
        path: P,
        format: OutputFormat,
    ) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        match format {
            OutputFormat::Text => {
                std::fs::write(path, Self::format_grid(crossword, solution))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            OutputFormat::Json => {
                solution
                    .save_to_file(path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            OutputFormat::Visual => {
                std::fs::write(path, Self::create_visual(crossword, solution))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            OutputFormat::Png => render::save_png(crossword, solution, path)?,
        }

        Ok(())
    }

    /// Create an annotated representation of the fill
    fn create_visual(crossword: &Crossword, solution: &Solution) -> String {
        let mut output = String::new();

        output.push_str(&format!("Crossword {} ({}x{})\n", solution.metadata.id, solution.width, solution.height));
        output.push_str(&"=".repeat(50));
        output.push_str("\n\n");
        output.push_str(&Self::format_grid_with_coords(crossword, solution));

        output.push_str("\nEntries:\n");
        output.push_str(&Self::format_entries(solution));

        if let Some(statistics) = &solution.statistics {
            output.push('\n');
            output.push_str(&statistics.to_string());
            output.push('\n');
        }

        output
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

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
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
    Magenta,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
            Color::Magenta => 35,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossword::parse_structure_from_string;
    use crate::csp::Assignment;
    use tempfile::tempdir;

    fn cross() -> (Crossword, Solution) {
        let crossword = parse_structure_from_string("#_#\n___\n#_#\n").unwrap();
        let assignment: Assignment = vec![(0, "CAR".to_string()), (1, "CAT".to_string())]
            .into_iter()
            .collect();
        let solution = Solution::new(&crossword, &assignment, None);
        (crossword, solution)
    }

    #[test]
    fn test_grid_formatting() {
        let (crossword, solution) = cross();
        assert_eq!(SolutionFormatter::format_grid(&crossword, &solution), "█C█\nCAT\n█R█\n");

        let with_coords = SolutionFormatter::format_grid_with_coords(&crossword, &solution);
        assert!(with_coords.starts_with("    0 1 2\n"));
        assert!(with_coords.contains(" 1  C A T"));
    }

    #[test]
    fn test_uncovered_open_cells_render_blank() {
        let crossword = parse_structure_from_string("_#\n").unwrap();
        let solution = Solution::new(&crossword, &Assignment::new(), None);
        assert_eq!(SolutionFormatter::format_grid(&crossword, &solution), " █\n");
    }

    #[test]
    fn test_format_entries() {
        let (_, solution) = cross();
        let entries = SolutionFormatter::format_entries(&solution);

        assert!(entries.contains("(0, 1) down : 3"));
        assert!(entries.contains("CAT"));
        assert_eq!(entries.lines().count(), 2);
    }

    #[test]
    fn test_save_solution_formats() {
        let (crossword, solution) = cross();
        let temp_dir = tempdir().unwrap();

        let text = temp_dir.path().join("out/grid.txt");
        SolutionFormatter::save_solution(&crossword, &solution, &text, OutputFormat::Text).unwrap();
        assert_eq!(std::fs::read_to_string(&text).unwrap(), "█C█\nCAT\n█R█\n");

        let json = temp_dir.path().join("grid.json");
        SolutionFormatter::save_solution(&crossword, &solution, &json, OutputFormat::Json).unwrap();
        assert_eq!(Solution::load_from_file(&json).unwrap().entries, solution.entries);

        let visual = temp_dir.path().join("grid_visual.txt");
        SolutionFormatter::save_solution(&crossword, &solution, &visual, OutputFormat::Visual).unwrap();
        assert!(std::fs::read_to_string(&visual).unwrap().contains("Entries:"));
    }

    #[test]
    fn test_save_solution_as_png() {
        let (crossword, solution) = cross();
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("images/cross.png");

        SolutionFormatter::save_solution(&crossword, &solution, &path, OutputFormat::Png).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (300, 300));
    }
}
