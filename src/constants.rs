//! Application constants
//!
//! Default values, marker tables and file-name conventions used throughout
//! the converter and watcher.

// =============================================================================
// Encoding Detection
// =============================================================================

/// Bytes sampled from the head of a file for encoding inference
pub const ENCODING_SAMPLE_SIZE: usize = 100_000;

/// Guesses at or below this confidence fall back to the default encoding
pub const ENCODING_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Encoding used when detection is not confident
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Encodings tried after the detected one, in order
pub const FALLBACK_ENCODINGS: &[&str] = &["utf-8", "latin-1", "cp1252", "iso-8859-1"];

// =============================================================================
// CSV Parsing
// =============================================================================

/// Field delimiter for every parse attempt
pub const DEFAULT_DELIMITER: u8 = b',';

/// Cell texts read as missing values
pub const NA_MARKERS: &[&str] = &[
    "",
    "#N/A",
    "#N/A N/A",
    "#NA",
    "-1.#IND",
    "-1.#QNAN",
    "-NaN",
    "-nan",
    "1.#IND",
    "1.#QNAN",
    "<NA>",
    "N/A",
    "NA",
    "NULL",
    "NaN",
    "None",
    "n/a",
    "nan",
    "null",
];

pub const TRUE_MARKERS: &[&str] = &["True", "TRUE", "true"];
pub const FALSE_MARKERS: &[&str] = &["False", "FALSE", "false"];

/// Prefix for columns whose header cell is empty
pub const UNNAMED_COLUMN_PREFIX: &str = "Unnamed: ";

// =============================================================================
// Validation
// =============================================================================

/// Leading rows compared cell by cell
pub const VALIDATION_SAMPLE_ROWS: usize = 5;

/// Largest numeric difference still considered a match
pub const NUMERIC_TOLERANCE: f64 = 1e-6;

// =============================================================================
// Files and Watching
// =============================================================================

pub const CSV_EXTENSION: &str = "csv";
pub const SPREADSHEET_EXTENSION: &str = "xlsx";
pub const ZIP_EXTENSION: &str = "zip";
pub const SEVEN_ZIP_EXTENSION: &str = "7z";

/// Extensions of partially downloaded files
pub const TEMP_EXTENSIONS: &[&str] = &["tmp", "crdownload", "part"];

/// Wait before touching a newly detected file, in seconds
pub const DEFAULT_SETTLE_SECS: u64 = 3;

/// Directory scan interval, in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

/// Append-only log written to the working directory
pub const LOG_FILE_NAME: &str = "file_processing.log";

/// Crate name used as the default tracing filter target
pub const LOG_TARGET: &str = "downloads_tidy";
