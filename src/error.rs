//! Configuration error types.
//!
//! Raw text from the UI is parsed into typed values here. A failed parse is
//! never fatal: callers log it and keep the previous value.

use std::fmt;

use crate::config::Field;

/// Rejected configuration input
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The field arrived with no text at all.
    Empty {
        /// Field that was left blank.
        field: Field,
    },

    /// The text could not be read as a finite number.
    NotANumber {
        /// Field the text was meant for.
        field: Field,
        /// The offending text, as received.
        input: String,
    },
}

impl ConfigError {
    /// Field the error refers to
    pub fn field(&self) -> Field {
        match self {
            ConfigError::Empty { field } | ConfigError::NotANumber { field, .. } => *field,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Empty { field } => write!(f, "no value given for '{}'", field.name()),
            ConfigError::NotANumber { field, input } => {
                write!(f, "'{}' is not a number (field '{}')", input, field.name())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Convenience alias: a `Result` using `ConfigError` as the error type.
pub type ConfigResult<T> = Result<T, ConfigError>;
