//! Independent validation of filled crosswords

use super::Solution;
use crate::crossword::{Crossword, Variable};
use crate::csp::Assignment;
use std::collections::HashMap;
use thiserror::Error;

/// A constraint broken by an assignment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    #[error("slot {slot} has no word")]
    Unassigned { slot: Variable },

    #[error("slot {slot} needs {expected} letters but {word:?} has {actual}")]
    LengthMismatch {
        slot: Variable,
        word: String,
        expected: usize,
        actual: usize,
    },

    #[error("{word:?} is used by both {first} and {second}")]
    DuplicateWord {
        word: String,
        first: Variable,
        second: Variable,
    },

    #[error("{first} and {second} disagree where they cross ({first_letter:?} vs {second_letter:?})")]
    CrossingMismatch {
        first: Variable,
        second: Variable,
        first_letter: Option<char>,
        second_letter: Option<char>,
    },

    #[error("slot {slot} does not exist in this puzzle")]
    UnknownSlot { slot: Variable },
}

/// Result of solution validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<ConstraintViolation>,
    pub details: ValidationDetails,
}

/// Detailed validation information
#[derive(Debug, Clone, Default)]
pub struct ValidationDetails {
    pub slots_checked: usize,
    pub crossings_checked: usize,
    pub validation_time_ms: u64,
}

/// Re-checks an assignment against every crossword constraint, reporting all
/// violations instead of stopping at the first
#[derive(Debug, Clone, Copy, Default)]
pub struct SolutionValidator;

impl SolutionValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a complete assignment of `crossword`
    pub fn validate(&self, crossword: &Crossword, assignment: &Assignment) -> ValidationResult {
        let start_time = std::time::Instant::now();
        let mut violations = Vec::new();
        let mut owners: HashMap<&str, Variable> = HashMap::new();
        let mut crossings_checked = 0;

        for (var, slot) in crossword.variables().iter().enumerate() {
            let Some(word) = assignment.get(var) else {
                violations.push(ConstraintViolation::Unassigned { slot: *slot });
                continue;
            };

            let actual = word.chars().count();
            if actual != slot.length {
                violations.push(ConstraintViolation::LengthMismatch {
                    slot: *slot,
                    word: word.to_string(),
                    expected: slot.length,
                    actual,
                });
            }

            if let Some(first) = owners.insert(word, *slot) {
                violations.push(ConstraintViolation::DuplicateWord {
                    word: word.to_string(),
                    first,
                    second: *slot,
                });
            }

            // Each crossing once, from its lower-numbered side
            for &neighbor in crossword.neighbors(var).iter().filter(|&&n| n > var) {
                let (Some(other), Some((i, j))) = (assignment.get(neighbor), crossword.overlap(var, neighbor)) else {
                    continue;
                };
                crossings_checked += 1;

                let first_letter = word.chars().nth(i);
                let second_letter = other.chars().nth(j);
                if first_letter != second_letter {
                    violations.push(ConstraintViolation::CrossingMismatch {
                        first: *slot,
                        second: *crossword.variable(neighbor),
                        first_letter,
                        second_letter,
                    });
                }
            }
        }

        ValidationResult {
            is_valid: violations.is_empty(),
            violations,
            details: ValidationDetails {
                slots_checked: crossword.variable_count(),
                crossings_checked,
                validation_time_ms: start_time.elapsed().as_millis() as u64,
            },
        }
    }

    /// Validate a stored solution against `crossword`
    pub fn validate_solution(&self, crossword: &Crossword, solution: &Solution) -> ValidationResult {
        match solution.to_assignment(crossword) {
            Ok(assignment) => self.validate(crossword, &assignment),
            Err(violation) => ValidationResult {
                is_valid: false,
                violations: vec![violation],
                details: ValidationDetails::default(),
            },
        }
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Validation Result:")?;
        writeln!(f, "  Valid: {}", if self.is_valid { "Yes" } else { "No" })?;
        writeln!(f, "  Slots checked: {}", self.details.slots_checked)?;
        writeln!(f, "  Crossings checked: {}", self.details.crossings_checked)?;
        writeln!(f, "  Validation time: {}ms", self.details.validation_time_ms)?;

        if !self.violations.is_empty() {
            writeln!(f, "  Violations ({}):", self.violations.len())?;
            for violation in self.violations.iter().take(10) {
                writeln!(f, "    - {}", violation)?;
            }
            if self.violations.len() > 10 {
                writeln!(f, "    ... and {} more", self.violations.len() - 10)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossword::parse_structure_from_string;

    fn assignment(pairs: &[(usize, &str)]) -> Assignment {
        pairs.iter().map(|&(var, word)| (var, word.to_string())).collect()
    }

    #[test]
    fn test_valid_assignment() {
        let crossword = parse_structure_from_string("#_#\n___\n#_#\n").unwrap();
        let result = SolutionValidator::new().validate(&crossword, &assignment(&[(0, "CAR"), (1, "CAT")]));

        assert!(result.is_valid);
        assert_eq!(result.details.slots_checked, 2);
        assert_eq!(result.details.crossings_checked, 1);
    }

    #[test]
    fn test_reports_every_violation() {
        let crossword = parse_structure_from_string("#_#\n___\n#_#\n").unwrap();
        let result = SolutionValidator::new().validate(&crossword, &assignment(&[(0, "CAT"), (1, "CAT")]));

        assert!(!result.is_valid);
        // Same word twice, and letter 1 of each is 'A' so the crossing is fine
        assert_eq!(result.violations.len(), 1);
        assert!(matches!(result.violations[0], ConstraintViolation::DuplicateWord { .. }));
    }

    #[test]
    fn test_crossing_and_length_violations() {
        let crossword = parse_structure_from_string("#_#\n___\n#_#\n").unwrap();
        let result = SolutionValidator::new().validate(&crossword, &assignment(&[(0, "BOX"), (1, "CATS")]));

        assert!(result.violations.iter().any(|v| matches!(v, ConstraintViolation::LengthMismatch { actual: 4, .. })));
        assert!(result.violations.iter().any(|v| matches!(
            v,
            ConstraintViolation::CrossingMismatch { first_letter: Some('O'), second_letter: Some('A'), .. }
        )));
    }

    #[test]
    fn test_unassigned_slots() {
        let crossword = parse_structure_from_string("___\n###\n___\n").unwrap();
        let result = SolutionValidator::new().validate(&crossword, &assignment(&[(0, "CAT")]));

        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].to_string(), "slot (2, 0) across : 3 has no word");
    }

    #[test]
    fn test_display_lists_violations() {
        let crossword = parse_structure_from_string("___\n").unwrap();
        let result = SolutionValidator::new().validate(&crossword, &Assignment::new());
        let text = result.to_string();

        assert!(text.contains("Valid: No"));
        assert!(text.contains("has no word"));
    }
}
