use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PayrollSortError {
    #[error("Source file not found or unreadable: {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Format error at line {line}: malformed record: {source}")]
    MalformedRecord {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("Format error at line {line}: column {column} required, found {found} fields")]
    MissingColumn { line: u64, column: usize, found: usize },

    #[error("Format error at line {line}: column {column} is not an integer: {value:?}")]
    InvalidNumber {
        line: u64,
        column: usize,
        value: String,
    },

    #[error("Write error on {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Broad failure category reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Format,
    Write,
    Config,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not-found"),
            ErrorKind::Format => write!(f, "format"),
            ErrorKind::Write => write!(f, "write"),
            ErrorKind::Config => write!(f, "config"),
        }
    }
}

impl PayrollSortError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PayrollSortError::SourceUnavailable { .. } => ErrorKind::NotFound,
            PayrollSortError::MalformedRecord { .. }
            | PayrollSortError::MissingColumn { .. }
            | PayrollSortError::InvalidNumber { .. } => ErrorKind::Format,
            PayrollSortError::Write { .. } => ErrorKind::Write,
            PayrollSortError::ConfigError(_) => ErrorKind::Config,
        }
    }

    /// Source line the error points at, when there is one.
    pub fn line(&self) -> Option<u64> {
        match self {
            PayrollSortError::MalformedRecord { line, .. }
            | PayrollSortError::MissingColumn { line, .. }
            | PayrollSortError::InvalidNumber { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PayrollSortError>;
