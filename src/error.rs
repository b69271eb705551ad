//! Error handling for CSV conversion and archive extraction.
//!
//! Errors are split along the failure taxonomy of the pipeline: a single
//! parse attempt can fail (`ReadError`), a whole file can fail
//! (`ProcessingError`), and the process itself can fail to start
//! (`StartupError`). Only the last one is ever fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of one parse attempt against one encoding.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("bytes are not valid {encoding}")]
    Decode { encoding: String },

    #[error("unknown encoding label: {label}")]
    UnknownEncoding { label: String },

    #[error("Error tokenizing data. Expected {expected} fields in line {line}, saw {found}")]
    Malformed {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("EOF inside string starting at line {line}")]
    UnterminatedQuote { line: u64 },

    #[error("no columns to parse from file")]
    Empty,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("table construction failed: {0}")]
    Table(#[from] polars::error::PolarsError),
}

impl ReadError {
    /// Field-count mismatches are the only errors worth retrying with a
    /// relaxed parser under the same encoding.
    pub fn is_structural(&self) -> bool {
        matches!(self, ReadError::Malformed { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ReadError::Decode { .. })
    }
}

/// Per-file failure. Never propagates past the dispatcher.
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("could not read {path} with any encoding or parsing strategy")]
    Exhausted { path: PathBuf },

    #[error("failed to write spreadsheet {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("{path} is not a valid {format} archive")]
    ArchiveCorrupt { path: PathBuf, format: String },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected failure on {path}: {message}")]
    Unexpected { path: PathBuf, message: String },
}

impl ProcessingError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn unexpected(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Unexpected {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Internal validator failure; folded into an all-false result.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("source CSV could not be re-read")]
    SourceUnreadable,

    #[error("spreadsheet could not be opened: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),

    #[error("spreadsheet has no worksheet")]
    NoWorksheet,

    #[error("spreadsheet has no column '{name}'")]
    MissingColumn { name: String },

    #[error("spreadsheet has no row {row} (it has {height})")]
    MissingRow { row: usize, height: usize },

    #[error("table construction failed: {0}")]
    Table(#[from] polars::error::PolarsError),
}

/// Conditions that stop the watcher before it starts.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Downloads directory not found at: {path}")]
    WatchDirMissing { path: PathBuf },

    #[error("could not open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, ProcessingError>;
