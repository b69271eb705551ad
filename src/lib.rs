//! Downloads Tidy Library
//!
//! Keeps a downloads folder tidy: CSV files are converted to XLSX and only
//! removed once the spreadsheet has been re-read and checked against the
//! source, and `.zip`/`.7z` archives are extracted in place.
//!
//! This library provides tools for:
//! - Detecting the text encoding of a CSV file
//! - Reading malformed CSV through ordered encoding and parser fallbacks
//! - Writing tables to XLSX and validating the result cell by cell
//! - Extracting archives
//! - Watching a directory and dispatching new files

pub mod archive;
pub mod config;
pub mod constants;
pub mod encoding;
pub mod error;
pub mod models;
pub mod normalize;
pub mod processor;
pub mod reader;
pub mod report;
pub mod spreadsheet;
pub mod table;
pub mod validator;
pub mod watcher;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{ProcessingError, ReadError, Result, StartupError, ValidationError};
pub use models::{FileKind, ProcessingOutcome, ValidationResult};
pub use processor::{CsvConverter, process_csv};
pub use reader::{CsvReader, ReadOutcome, read_csv};
pub use report::{ConsoleReporter, Level, MemoryReporter, Reporter};
pub use validator::ConversionValidator;
pub use watcher::{DirectoryWatcher, DownloadHandler};
