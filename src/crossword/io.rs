//! File I/O for crossword structures and word lists

use super::Crossword;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;

/// Character marking an open cell in a structure file
pub const OPEN_CELL: char = '_';

/// Load a crossword structure from a text file
/// Format: one line per row, '_' for open cells and any other character for blocked cells
pub fn load_structure_from_file<P: AsRef<Path>>(path: P) -> Result<Crossword> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read structure file: {}", path.as_ref().display()))?;

    parse_structure_from_string(&content)
        .with_context(|| format!("Failed to parse structure file: {}", path.as_ref().display()))
}

/// Parse a crossword structure from its string representation
pub fn parse_structure_from_string(content: &str) -> Result<Crossword> {
    let mut lines: Vec<&str> = content.lines().collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        anyhow::bail!("Structure file is empty or contains no rows");
    }

    let rows = lines
        .iter()
        .map(|line| line.chars().map(|ch| ch == OPEN_CELL).collect())
        .collect();

    Ok(Crossword::from_structure(rows)?)
}

/// Load a word list, one word per line
pub fn load_words_from_file<P: AsRef<Path>>(path: P) -> Result<BTreeSet<String>> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read word list: {}", path.as_ref().display()))?;

    Ok(parse_words_from_string(&content))
}

/// Parse a word list: words are trimmed and upper-cased, blank lines skipped
/// and duplicates collapsed
pub fn parse_words_from_string(content: &str) -> BTreeSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_uppercase)
        .collect()
}

/// Convert a crossword structure back to its file representation
pub fn structure_to_string(crossword: &Crossword) -> String {
    let mut result = String::with_capacity(crossword.height() * (crossword.width() + 1));

    for row in 0..crossword.height() {
        for col in 0..crossword.width() {
            result.push(if crossword.is_open(row, col) { OPEN_CELL } else { '#' });
        }
        result.push('\n');
    }

    result
}

/// List the structure files (`*.txt`) of a directory, sorted by name
pub fn list_structure_files<P: AsRef<Path>>(dir_path: P) -> Result<Vec<(String, std::path::PathBuf)>> {
    let dir = std::fs::read_dir(&dir_path)
        .with_context(|| format!("Failed to read directory: {}", dir_path.as_ref().display()))?;

    let mut files = Vec::new();

    for entry in dir {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();

        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string();
            files.push((name, path));
        }
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

/// Create example structure and word files
pub fn create_example_puzzles<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    let structures = dir.join("structures");
    let words = dir.join("words");

    for path in [&structures, &words] {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }

    // A single crossing
    let cross = "#_#\n___\n#_#\n";
    std::fs::write(structures.join("cross.txt"), cross).context("Failed to write cross.txt")?;

    // Four slots around a blocked centre
    let frame = "____\n_##_\n____\n";
    std::fs::write(structures.join("frame.txt"), frame).context("Failed to write frame.txt")?;

    // A denser grid with several crossings
    let lattice = "#___#\n_#_#_\n_____\n_#_#_\n#___#\n";
    std::fs::write(structures.join("lattice.txt"), lattice).context("Failed to write lattice.txt")?;

    let small = [
        "ant", "art", "bat", "car", "cat", "cold", "doe", "dog", "tree", "one", "ten", "net",
        "tone", "note", "rate", "tear", "ear", "eat", "tea", "ate",
    ]
    .join("\n");
    std::fs::write(words.join("small.txt"), small + "\n").context("Failed to write small.txt")?;

    Ok(())
}
