//! Template error types

use std::fmt;

/// Template rendering errors
///
/// Every variant raised while walking the template carries the 1-based
/// line and column of the tag that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Key not found in data context
    UndefinedKey {
        /// The key that was not found
        key: String,
        line: usize,
        column: usize,
    },

    /// Malformed template syntax
    MalformedSyntax {
        /// Error message
        message: String,
        line: usize,
        column: usize,
    },

    /// Array or table written directly to the output
    NotPrintable {
        /// The expression that resolved to a compound value
        expr: String,
        /// "array" or "table"
        kind: &'static str,
        line: usize,
        column: usize,
    },

    /// `each` applied to something that is not an array
    NotIterable {
        expr: String,
        line: usize,
        column: usize,
    },

    /// A required module could not be resolved, read or parsed
    Module {
        /// Specifier as written in the template
        specifier: String,
        reason: String,
        line: usize,
        column: usize,
    },

    /// Template rendering timed out (malformed input protection)
    Timeout {
        /// Maximum allowed duration
        max_duration: std::time::Duration,
        /// Actual elapsed time
        elapsed: std::time::Duration,
    },
}

impl TemplateError {
    /// Position of the offending tag, if the error has one
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            TemplateError::UndefinedKey { line, column, .. }
            | TemplateError::MalformedSyntax { line, column, .. }
            | TemplateError::NotPrintable { line, column, .. }
            | TemplateError::NotIterable { line, column, .. }
            | TemplateError::Module { line, column, .. } => Some((*line, *column)),
            TemplateError::Timeout { .. } => None,
        }
    }
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UndefinedKey { key, line, column } => {
                write!(f, "Undefined key '{}' at {}:{}", key, line, column)
            }
            TemplateError::MalformedSyntax {
                message,
                line,
                column,
            } => {
                write!(f, "Malformed syntax at {}:{}: {}", line, column, message)
            }
            TemplateError::NotPrintable {
                expr,
                kind,
                line,
                column,
            } => {
                write!(
                    f,
                    "Cannot output {} '{}' at {}:{}. Use nested keys or <% each {} |item| %>",
                    kind, expr, line, column, expr
                )
            }
            TemplateError::NotIterable { expr, line, column } => {
                write!(f, "'{}' is not an array at {}:{}", expr, line, column)
            }
            TemplateError::Module {
                specifier,
                reason,
                line,
                column,
            } => {
                write!(
                    f,
                    "Cannot require '{}' at {}:{}: {}",
                    specifier, line, column, reason
                )
            }
            TemplateError::Timeout {
                max_duration,
                elapsed,
            } => {
                write!(
                    f,
                    "Template rendering timed out after {:.2}s (max: {:.2}s). Check for unclosed <% ... %> tags or blocks.",
                    elapsed.as_secs_f64(),
                    max_duration.as_secs_f64()
                )
            }
        }
    }
}

impl std::error::Error for TemplateError {}
