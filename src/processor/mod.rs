//! Conversion orchestrator.
//!
//! Drives one CSV file through read, normalize, write and validate, and
//! decides whether the original may be removed. Every failure is turned
//! into a [`ProcessingOutcome`] here; nothing escapes to the watcher.

#[cfg(test)]
pub mod tests;

use crate::config::AppConfig;
use crate::constants::SPREADSHEET_EXTENSION;
use crate::error::{ProcessingError, Result};
use crate::models::{FileKind, ProcessingOutcome, display_name};
use crate::normalize::preserve_numeric_precision;
use crate::reader::CsvReader;
use crate::report::Reporter;
use crate::spreadsheet::write_spreadsheet;
use crate::validator::ConversionValidator;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Converts CSV files to spreadsheets next to them
pub struct CsvConverter<'a> {
    config: &'a AppConfig,
    reporter: &'a dyn Reporter,
}

impl<'a> CsvConverter<'a> {
    pub fn new(config: &'a AppConfig, reporter: &'a dyn Reporter) -> Self {
        Self { config, reporter }
    }

    /// Convert `path` and report how it ended. Never fails.
    pub fn run(&self, path: &Path) -> ProcessingOutcome {
        match self.convert(path) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.reporter.error(&format!(
                    "Failed to process {}. Error: {}",
                    display_name(path),
                    e
                ));
                ProcessingOutcome::ConversionFailed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// True only when the spreadsheet validated and the CSV was removed
    pub fn process_csv(&self, path: &Path) -> bool {
        self.run(path).is_converted()
    }

    /// The conversion sequence, with failures still typed
    pub fn convert(&self, path: &Path) -> Result<ProcessingOutcome> {
        let name = display_name(path);
        self.reporter.processing_started(&name, FileKind::Csv);

        let read = CsvReader::new(&self.config.reader, self.reporter).read(path)?;
        let table = read.table;
        if table.height() == 0 {
            self.reporter.warning(&format!(
                "CSV file {} is empty. Skipping conversion.",
                name
            ));
            return Ok(ProcessingOutcome::SkippedEmpty);
        }

        self.reporter.info(&format!(
            "CSV dimensions: {} rows x {} columns",
            table.height(),
            table.width()
        ));

        let normalized = preserve_numeric_precision(&table);
        let artifact = path.with_extension(SPREADSHEET_EXTENSION);
        write_spreadsheet(&normalized, &artifact)?;
        self.reporter
            .success(&format!("Converted to: {}", display_name(&artifact)));

        let validator = ConversionValidator::new(
            &self.config.reader,
            &self.config.validation,
            self.reporter,
        );
        let result = validator.validate(path, &artifact);
        self.reporter.validation_result(&result);

        if !result.is_valid() {
            self.reporter
                .error("Keeping original CSV file due to validation failure");
            return Ok(ProcessingOutcome::ValidationFailed { result, artifact });
        }

        fs::remove_file(path).map_err(|e| ProcessingError::io(path, e))?;
        self.reporter
            .dim(&format!("Removed original CSV file: {}", name));
        debug!(
            "{} converted with {} using {}",
            name, read.encoding, read.attempt
        );
        Ok(ProcessingOutcome::Converted { artifact })
    }
}

/// Convert one file with the given settings
pub fn process_csv(path: &Path, config: &AppConfig, reporter: &dyn Reporter) -> bool {
    CsvConverter::new(config, reporter).process_csv(path)
}
