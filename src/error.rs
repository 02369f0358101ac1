//! Error types for the simulation.
//!
//! Every error here is fatal: nothing is retried and there is no degraded
//! mode. `main` prints the message and exits with status 1.

use std::path::PathBuf;
use thiserror::Error;

/// Rejected startup configuration, detected before any worker thread exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid width must be > 0")]
    ZeroWidth,

    #[error("grid height must be > 0")]
    ZeroHeight,

    #[error("{width}x{height} universe exceeds the limit of {max} cells")]
    TooLarge { width: usize, height: usize, max: usize },

    #[error("worker count must be > 0")]
    ZeroWorkers,

    /// `width / workers` would be zero, leaving some worker without columns.
    #[error("{workers} workers cannot share {width} columns (at most one worker per column)")]
    TooManyWorkers { workers: usize, width: usize },

    #[error("frame delay must be a positive number of seconds, got {0}")]
    InvalidDelay(String),

    #[error("random density must be within 0.0..=1.0, got {0}")]
    InvalidDensity(String),
}

/// Malformed seed data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("could not read '{path}': {message}")]
    Io { path: PathBuf, message: String },

    #[error("too few lines: expected {expected}, found {found}")]
    TooFewRows { expected: usize, found: usize },

    #[error("too many lines: expected {expected}")]
    TooManyRows { expected: usize },

    #[error("line {row} too short: expected {expected} cells, found {len}")]
    RowTooShort { row: usize, expected: usize, len: usize },

    #[error("line {row} too long: expected {expected} cells, found {len}")]
    RowTooLong { row: usize, expected: usize, len: usize },

    #[error("invalid cell symbol {symbol:?} at line {row}, column {col} (expected '0' or '1')")]
    InvalidSymbol { row: usize, col: usize, symbol: char },
}

/// Top-level error for everything the simulation can fail on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifeError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid universe: {0}")]
    Load(#[from] LoadError),

    /// Allocation or OS resource failure (thread spawn).
    #[error("unable to create {what}: {message}")]
    Resource { what: String, message: String },

    /// Internal corruption; always a synchronization bug.
    #[error("internal invariant violated: {0}")]
    Invariant(String),

    #[error("render failed: {0}")]
    Render(String),
}

impl From<std::io::Error> for LifeError {
    fn from(err: std::io::Error) -> Self {
        LifeError::Render(err.to_string())
    }
}

/// Result type for simulation operations.
pub type LifeResult<T> = Result<T, LifeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_wraps_into_life_error() {
        let err: LifeError = ConfigError::TooManyWorkers { workers: 8, width: 4 }.into();
        assert_eq!(
            err.to_string(),
            "invalid configuration: 8 workers cannot share 4 columns (at most one worker per column)"
        );
    }

    #[test]
    fn load_error_names_position() {
        let err = LoadError::InvalidSymbol { row: 2, col: 5, symbol: 'x' };
        let text = err.to_string();
        assert!(text.contains("line 2"));
        assert!(text.contains("column 5"));
        assert!(text.contains("'x'"));
    }
}
