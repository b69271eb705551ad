//! Core data structures shared by the conversion pipeline.
//!
//! Defines the encoding guess, parse attempt descriptions, the validation
//! verdict and the terminal outcome of one file's processing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::{CSV_EXTENSION, SEVEN_ZIP_EXTENSION, ZIP_EXTENSION};

/// Result of statistical encoding inference over a byte sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingGuess {
    pub encoding: Option<String>,
    pub confidence: f64,
}

impl EncodingGuess {
    pub fn none() -> Self {
        Self {
            encoding: None,
            confidence: 0.0,
        }
    }

    pub fn certain(encoding: &str) -> Self {
        Self {
            encoding: Some(encoding.to_string()),
            confidence: 1.0,
        }
    }
}

/// Parser behaviour on rows with more fields than the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Engine {
    /// Reject the whole file on the first malformed row
    Fast,
    /// Apply the bad-line policy to malformed rows
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadLinePolicy {
    Error,
    Skip,
    Warn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuotingMode {
    Minimal,
    All,
    None,
}

/// One named parsing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParseAttempt {
    pub name: &'static str,
    pub engine: Engine,
    pub bad_lines: BadLinePolicy,
    pub quoting: QuotingMode,
    pub delimiter: u8,
}

impl ParseAttempt {
    /// The first attempt for every encoding
    pub const STANDARD: ParseAttempt = ParseAttempt {
        name: "Standard parser",
        engine: Engine::Fast,
        bad_lines: BadLinePolicy::Error,
        quoting: QuotingMode::Minimal,
        delimiter: b',',
    };

    /// Relaxations tried, in order, after a field-count mismatch
    pub const RELAXATIONS: [ParseAttempt; 5] = [
        ParseAttempt {
            name: "Lenient engine with error skip",
            engine: Engine::Lenient,
            bad_lines: BadLinePolicy::Skip,
            quoting: QuotingMode::Minimal,
            delimiter: b',',
        },
        ParseAttempt {
            name: "Lenient engine with error warn",
            engine: Engine::Lenient,
            bad_lines: BadLinePolicy::Warn,
            quoting: QuotingMode::Minimal,
            delimiter: b',',
        },
        ParseAttempt {
            name: "Fast engine with QUOTE_ALL",
            engine: Engine::Fast,
            bad_lines: BadLinePolicy::Error,
            quoting: QuotingMode::All,
            delimiter: b',',
        },
        ParseAttempt {
            name: "Fast engine with QUOTE_NONE",
            engine: Engine::Fast,
            bad_lines: BadLinePolicy::Error,
            quoting: QuotingMode::None,
            delimiter: b',',
        },
        ParseAttempt {
            name: "Lenient engine with QUOTE_ALL",
            engine: Engine::Lenient,
            bad_lines: BadLinePolicy::Warn,
            quoting: QuotingMode::All,
            delimiter: b',',
        },
    ];

    /// Same strategy with a different field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl fmt::Display for ParseAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Verdict of comparing a source CSV with its produced spreadsheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub dimensions_match: bool,
    pub columns_match: bool,
    pub data_types_preserved: bool,
    pub sample_data_match: bool,
}

impl ValidationResult {
    /// Fail-closed verdict used whenever validation itself breaks
    pub fn failed() -> Self {
        Self {
            dimensions_match: false,
            columns_match: false,
            data_types_preserved: false,
            sample_data_match: false,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.dimensions_match
            && self.columns_match
            && self.data_types_preserved
            && self.sample_data_match
    }
}

/// Kind of file as routed by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Csv,
    Zip,
    SevenZip,
}

impl FileKind {
    /// Route by lower-cased extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = lowercase_extension(path)?;
        match extension.as_str() {
            CSV_EXTENSION => Some(FileKind::Csv),
            ZIP_EXTENSION => Some(FileKind::Zip),
            SEVEN_ZIP_EXTENSION => Some(FileKind::SevenZip),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileKind::Csv => "CSV",
            FileKind::Zip => "ZIP",
            FileKind::SevenZip => "7z",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Terminal state of one file's journey through the watcher
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingOutcome {
    /// Spreadsheet written and validated; the CSV was removed
    Converted { artifact: PathBuf },
    /// The CSV could not be read or written; nothing was removed
    ConversionFailed { reason: String },
    /// Both the CSV and the spreadsheet were kept for inspection
    ValidationFailed {
        result: ValidationResult,
        artifact: PathBuf,
    },
    SkippedEmpty,
    SkippedUnsupportedType { extension: String },
    /// File vanished or is still downloading
    SkippedTransient,
    Extracted { destination: PathBuf },
    ExtractionFailed { reason: String },
}

impl ProcessingOutcome {
    /// True when the original CSV was converted and removed
    pub fn is_converted(&self) -> bool {
        matches!(self, ProcessingOutcome::Converted { .. })
    }
}

/// Lower-cased extension without the leading dot
pub fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// File name for log lines
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
