//! Configuration management and validation.
//!
//! Provides configuration structures for CSV reading, conversion
//! validation and directory watching. Every default reproduces the
//! behaviour of a plain, argument-less run.

use crate::constants::{
    DEFAULT_DELIMITER, DEFAULT_ENCODING, DEFAULT_POLL_INTERVAL_MS, DEFAULT_SETTLE_SECS,
    ENCODING_CONFIDENCE_THRESHOLD, ENCODING_SAMPLE_SIZE, FALLBACK_ENCODINGS, LOG_FILE_NAME,
    NUMERIC_TOLERANCE, TEMP_EXTENSIONS, VALIDATION_SAMPLE_ROWS,
};
use crate::encoding;
use crate::error::StartupError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Resilient CSV reader settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Bytes sampled for encoding detection
    pub sample_size: usize,

    /// Detector guesses must exceed this to be used
    pub confidence_threshold: f64,

    /// Encoding assumed when detection is not confident
    pub default_encoding: String,

    /// Encodings tried after the detected one, in order
    pub fallback_encodings: Vec<String>,

    /// Field delimiter for every parse attempt
    pub delimiter: u8,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            sample_size: ENCODING_SAMPLE_SIZE,
            confidence_threshold: ENCODING_CONFIDENCE_THRESHOLD,
            default_encoding: DEFAULT_ENCODING.to_string(),
            fallback_encodings: FALLBACK_ENCODINGS.iter().map(|e| e.to_string()).collect(),
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl ReaderConfig {
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_fallback_encodings(mut self, encodings: &[&str]) -> Self {
        self.fallback_encodings = encodings.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Conversion validator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Leading rows compared cell by cell
    pub sample_rows: usize,

    /// Largest numeric difference still considered equal
    pub tolerance: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            sample_rows: VALIDATION_SAMPLE_ROWS,
            tolerance: NUMERIC_TOLERANCE,
        }
    }
}

/// Directory watcher settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Directory watched non-recursively
    pub watch_dir: PathBuf,

    /// Blocking wait before a detected file is touched
    pub settle_delay: Duration,

    /// Interval between directory scans
    pub poll_interval: Duration,

    /// Extensions of partial downloads, lower-case without the dot
    pub temp_extensions: Vec<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            watch_dir: default_watch_dir().unwrap_or_else(|| PathBuf::from("Downloads")),
            settle_delay: Duration::from_secs(DEFAULT_SETTLE_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            temp_extensions: TEMP_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl WatchConfig {
    pub fn with_watch_dir(mut self, watch_dir: PathBuf) -> Self {
        self.watch_dir = watch_dir;
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// True for partial-download names such as `report.csv.crdownload`
    pub fn is_temp_extension(&self, extension: &str) -> bool {
        self.temp_extensions
            .iter()
            .any(|temp| temp.eq_ignore_ascii_case(extension))
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub reader: ReaderConfig,
    pub validation: ValidationConfig,
    pub watch: WatchConfig,

    /// Append-mode log file
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn with_reader(mut self, reader: ReaderConfig) -> Self {
        self.reader = reader;
        self
    }

    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_watch(mut self, watch: WatchConfig) -> Self {
        self.watch = watch;
        self
    }

    pub fn with_log_file(mut self, log_file: PathBuf) -> Self {
        self.log_file = Some(log_file);
        self
    }

    /// Log file path, defaulting to the working directory
    pub fn log_file_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME))
    }

    /// Reject settings that would make the pipeline meaningless
    pub fn validate(&self) -> Result<(), StartupError> {
        if !(0.0..=1.0).contains(&self.reader.confidence_threshold) {
            return Err(StartupError::Configuration {
                message: format!(
                    "confidence threshold must be within [0, 1], got {}",
                    self.reader.confidence_threshold
                ),
            });
        }

        if self.reader.sample_size == 0 {
            return Err(StartupError::Configuration {
                message: "encoding sample size must be positive".to_string(),
            });
        }

        if self.reader.default_encoding.trim().is_empty() {
            return Err(StartupError::Configuration {
                message: "default encoding must not be empty".to_string(),
            });
        }

        if let Some(label) = std::iter::once(&self.reader.default_encoding)
            .chain(&self.reader.fallback_encodings)
            .find(|label| !encoding::is_supported(label))
        {
            return Err(StartupError::Configuration {
                message: format!("unsupported encoding: {}", label),
            });
        }

        if self.validation.tolerance < 0.0 {
            return Err(StartupError::Configuration {
                message: format!(
                    "validation tolerance must not be negative, got {}",
                    self.validation.tolerance
                ),
            });
        }

        if self.watch.poll_interval.is_zero() {
            return Err(StartupError::Configuration {
                message: "poll interval must be positive".to_string(),
            });
        }

        debug!("Configuration validated: {:?}", self);
        Ok(())
    }
}

/// The user's Downloads directory, falling back to `~/Downloads`
pub fn default_watch_dir() -> Option<PathBuf> {
    dirs::download_dir().or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
}
