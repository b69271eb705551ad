//! Leveled progress reporting.
//!
//! The pipeline never prints directly: it is handed a [`Reporter`] and
//! tells it what happened. `ConsoleReporter` renders coloured terminal
//! lines and mirrors everything into `tracing`, whose subscriber writes
//! the append-only log file. `MemoryReporter` records messages so tests
//! can assert on them.

use crate::error::StartupError;
use crate::models::{FileKind, ValidationResult};
use chrono::Local;
use colored::*;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::{error, info, warn};

/// Severity of a reported message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
    Success,
    Highlight,
    Dim,
}

/// Sink for pipeline progress. Implementations must return quickly.
pub trait Reporter {
    fn log(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warning(&self, message: &str) {
        self.log(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    fn success(&self, message: &str) {
        self.log(Level::Success, message);
    }

    fn highlight(&self, message: &str) {
        self.log(Level::Highlight, message);
    }

    fn dim(&self, message: &str) {
        self.log(Level::Dim, message);
    }

    fn processing_started(&self, file_name: &str, kind: FileKind) {
        self.highlight(&format!(">>> Processing {}: {}", kind, file_name));
    }

    fn validation_result(&self, result: &ValidationResult) {
        if result.is_valid() {
            self.success("VALIDATION PASSED Data integrity confirmed");
            return;
        }

        self.error("VALIDATION FAILED Issues detected:");
        self.error(&format!(
            "  Dimensions match: {}",
            yes_no(result.dimensions_match)
        ));
        self.error(&format!("  Columns match: {}", yes_no(result.columns_match)));
        self.error(&format!(
            "  Types preserved: {}",
            yes_no(result.data_types_preserved)
        ));
        self.error(&format!("  Data match: {}", yes_no(result.sample_data_match)));
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Coloured terminal output plus `tracing` events
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for ConsoleReporter {
    fn log(&self, level: Level, message: &str) {
        let timestamp = Local::now().format("%H:%M:%S").to_string();
        let rendered = match level {
            Level::Info => message.cyan(),
            Level::Warning => message.yellow(),
            Level::Error => message.red().bold(),
            Level::Success => message.green().bold(),
            Level::Highlight => message.magenta().bold(),
            Level::Dim => message.cyan().dimmed(),
        };
        println!("{} {}", format!("[{}]", timestamp).bright_black(), rendered);

        match level {
            Level::Warning => warn!("{}", message),
            Level::Error => error!("{}", message),
            _ => info!("{}", message),
        }
    }
}

/// Records every message in order
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: Mutex<Vec<(Level, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Messages recorded at `level`
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(recorded, _)| *recorded == level)
            .map(|(_, message)| message)
            .collect()
    }

    /// True if any message at any level contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.entries()
            .iter()
            .any(|(_, message)| message.contains(needle))
    }
}

impl Reporter for MemoryReporter {
    fn log(&self, level: Level, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}

/// Route `tracing` output to the append-only log file.
///
/// `RUST_LOG` overrides the default `info` filter for this crate.
pub fn setup_logging(log_file: &Path, verbose: bool) -> Result<(), StartupError> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|source| StartupError::LogFile {
            path: log_file.to_path_buf(),
            source,
        })?;

    let log_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{}={}", crate::constants::LOG_TARGET, log_level))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| StartupError::Configuration {
            message: format!("logging already initialised: {}", e),
        })?;

    Ok(())
}
