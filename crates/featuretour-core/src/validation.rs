//! Field rules checked before an operation issues any request.

/// A single check applied to one text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Value must contain something other than whitespace.
    NonBlank {
        /// Field name used in the message
        field: &'static str,
    },
    /// Trimmed value must have at least `min` characters.
    MinLength {
        /// Field name used in the message
        field: &'static str,
        /// Minimum character count
        min: usize,
    },
    /// Value must contain `needle`.
    Contains {
        /// Field name used in the message
        field: &'static str,
        /// Required character
        needle: char,
    },
}

impl Rule {
    /// Checks `value`, returning the user-facing message on failure.
    pub fn check(&self, value: &str) -> Result<(), String> {
        match *self {
            Rule::NonBlank { field } => {
                if value.trim().is_empty() {
                    Err(format!("{field} must not be empty"))
                } else {
                    Ok(())
                }
            }
            Rule::MinLength { field, min } => {
                if value.trim().chars().count() < min {
                    Err(format!("{field} must be at least {min} characters"))
                } else {
                    Ok(())
                }
            }
            Rule::Contains { field, needle } => {
                if value.contains(needle) {
                    Ok(())
                } else {
                    Err(format!("Enter a valid {field}"))
                }
            }
        }
    }
}

/// Runs each `(rule, value)` pair in order and stops at the first failure.
pub fn check_all(checks: &[(Rule, &str)]) -> Result<(), String> {
    checks.iter().try_for_each(|(rule, value)| rule.check(value))
}
