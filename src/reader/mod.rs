//! Resilient CSV reader.
//!
//! Failures are handled along two independent axes. A decode failure
//! abandons the current encoding at once. A field-count mismatch keeps the
//! encoding and walks the relaxation strategies against it, first success
//! wins. Any other parse error moves on to the next encoding. The read only
//! fails once every encoding has been exhausted.

pub mod parse;

#[cfg(test)]
pub mod tests;

pub use parse::{ParsedTable, parse_text};

use crate::config::ReaderConfig;
use crate::encoding;
use crate::error::{ProcessingError, ReadError, Result};
use crate::models::{EncodingGuess, ParseAttempt, display_name};
use crate::report::Reporter;
use polars::prelude::DataFrame;
use std::fs;
use std::path::Path;

/// A successfully read table and how it was obtained
#[derive(Debug)]
pub struct ReadOutcome {
    pub table: DataFrame,
    /// Encoding label that decoded the file
    pub encoding: String,
    /// Strategy that parsed it
    pub attempt: ParseAttempt,
    /// Raw detector output for the file head
    pub guess: EncodingGuess,
    pub skipped_rows: usize,
}

/// Reads CSV files, trying encodings and parse relaxations in order
pub struct CsvReader<'a> {
    config: &'a ReaderConfig,
    reporter: &'a dyn Reporter,
}

impl<'a> CsvReader<'a> {
    pub fn new(config: &'a ReaderConfig, reporter: &'a dyn Reporter) -> Self {
        Self { config, reporter }
    }

    /// Read `path` into a table, or fail with [`ProcessingError::Exhausted`]
    pub fn read(&self, path: &Path) -> Result<ReadOutcome> {
        let (detected, guess) = self.detect_encoding(path)?;
        let bytes = fs::read(path).map_err(|e| ProcessingError::io(path, e))?;

        for label in self.candidate_encodings(&detected) {
            match self.read_with_encoding(&bytes, &label) {
                Ok((parsed, attempt)) => {
                    self.reporter
                        .dim(&format!("Successfully read CSV with encoding: {}", label));
                    return Ok(ReadOutcome {
                        table: parsed.table,
                        encoding: label,
                        attempt,
                        guess,
                        skipped_rows: parsed.skipped_rows,
                    });
                }
                Err(e) if e.is_decode() => {
                    self.reporter
                        .dim(&format!("Could not decode {} as {}", display_name(path), label));
                }
                // Relaxation failures were already reported
                Err(e) if e.is_structural() => {}
                Err(e) => {
                    self.reporter
                        .error(&format!("Error reading CSV with {}: {}", label, e));
                }
            }
        }

        self.reporter.error("Failed to read CSV with any encoding");
        Err(ProcessingError::Exhausted {
            path: path.to_path_buf(),
        })
    }

    /// Detector verdict for the file head, with the confidence policy applied
    fn detect_encoding(&self, path: &Path) -> Result<(String, EncodingGuess)> {
        let (chosen, guess) = encoding::detect_file_encoding(
            path,
            self.config.sample_size,
            self.config.confidence_threshold,
            &self.config.default_encoding,
        )
        .map_err(|e| ProcessingError::io(path, e))?;

        match &guess.encoding {
            Some(encoding) if guess.confidence > self.config.confidence_threshold => {
                self.reporter.dim(&format!(
                    "Detected encoding: {} (confidence: {:.2})",
                    encoding, guess.confidence
                ));
            }
            _ => {
                self.reporter.warning(&format!(
                    "Low confidence encoding detection. Using {} fallback.",
                    self.config.default_encoding.to_uppercase()
                ));
            }
        }

        Ok((chosen, guess))
    }

    /// Detected encoding first, then the fallbacks, without repeats
    pub fn candidate_encodings(&self, detected: &str) -> Vec<String> {
        let fallbacks = self.config.fallback_encodings.iter().map(String::as_str);

        let mut candidates: Vec<String> = Vec::with_capacity(self.config.fallback_encodings.len() + 1);
        for label in std::iter::once(detected).chain(fallbacks) {
            if !candidates.iter().any(|seen| seen == label) {
                candidates.push(label.to_string());
            }
        }
        candidates
    }

    /// Standard parse, then relaxations on a field-count mismatch
    fn read_with_encoding(
        &self,
        bytes: &[u8],
        label: &str,
    ) -> std::result::Result<(ParsedTable, ParseAttempt), ReadError> {
        let text = encoding::decode(bytes, label)?;
        let standard = ParseAttempt::STANDARD.with_delimiter(self.config.delimiter);

        let error = match parse_text(&text, &standard, self.reporter) {
            Ok(parsed) => return Ok((parsed, standard)),
            Err(e) if e.is_structural() => e,
            Err(e) => return Err(e),
        };

        self.reporter
            .warning(&format!("Malformed CSV detected with {}: {}", label, error));
        self.reporter.info("Attempting fallback parsing strategies...");

        let relaxed = ParseAttempt::RELAXATIONS.iter().find_map(|strategy| {
            let attempt = strategy.with_delimiter(self.config.delimiter);
            self.reporter.dim(&format!("Trying: {}", attempt));
            parse_text(&text, &attempt, self.reporter)
                .ok()
                .map(|parsed| (parsed, attempt))
        });

        match relaxed {
            Some((parsed, attempt)) => {
                self.reporter
                    .success(&format!("CSV parsed successfully using: {}", attempt));
                Ok((parsed, attempt))
            }
            None => {
                self.reporter.error(&format!(
                    "All parsing strategies failed for encoding {}",
                    label
                ));
                Err(error)
            }
        }
    }
}

/// Read `path` with the given settings
pub fn read_csv(
    path: &Path,
    config: &ReaderConfig,
    reporter: &dyn Reporter,
) -> Result<ReadOutcome> {
    CsvReader::new(config, reporter).read(path)
}
