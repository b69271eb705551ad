//! Conversion validator.
//!
//! Re-reads both sides of a conversion from disk and compares them. The
//! source goes through the full resilient reader again rather than reusing
//! the table that was written, so a reader bug cannot validate itself.

use crate::config::{ReaderConfig, ValidationConfig};
use crate::error::ValidationError;
use crate::models::ValidationResult;
use crate::reader::CsvReader;
use crate::report::Reporter;
use crate::spreadsheet::read_spreadsheet;
use crate::table::{is_numeric_kind, value_as_number, value_as_text};
use polars::prelude::*;
use std::path::Path;

pub struct ConversionValidator<'a> {
    reader: &'a ReaderConfig,
    config: &'a ValidationConfig,
    reporter: &'a dyn Reporter,
}

impl<'a> ConversionValidator<'a> {
    pub fn new(
        reader: &'a ReaderConfig,
        config: &'a ValidationConfig,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            reader,
            config,
            reporter,
        }
    }

    /// Compare `source` with `produced`. Never fails: any error while
    /// loading either side yields [`ValidationResult::failed`].
    pub fn validate(&self, source: &Path, produced: &Path) -> ValidationResult {
        match self.try_validate(source, produced) {
            Ok(result) => result,
            Err(e) => {
                self.reporter.error(&format!("Validation error: {}", e));
                ValidationResult::failed()
            }
        }
    }

    fn try_validate(
        &self,
        source: &Path,
        produced: &Path,
    ) -> Result<ValidationResult, ValidationError> {
        let expected = CsvReader::new(self.reader, self.reporter)
            .read(source)
            .map_err(|_| ValidationError::SourceUnreadable)?
            .table;
        let actual = read_spreadsheet(produced)?;

        Ok(ValidationResult {
            dimensions_match: expected.shape() == actual.shape(),
            columns_match: expected.get_column_names() == actual.get_column_names(),
            data_types_preserved: self.types_preserved(&expected, &actual)?,
            sample_data_match: self.samples_match(&expected, &actual)?,
        })
    }

    /// Kinds must be equal, except that any two numeric kinds are accepted
    fn types_preserved(
        &self,
        expected: &DataFrame,
        actual: &DataFrame,
    ) -> Result<bool, ValidationError> {
        let mut preserved = true;
        for column in expected.get_columns() {
            let other = produced_column(actual, column.name().as_str())?;
            let (source_kind, target_kind) = (column.dtype(), other.dtype());
            if source_kind == target_kind
                || (is_numeric_kind(source_kind) && is_numeric_kind(target_kind))
            {
                continue;
            }
            preserved = false;
            self.reporter.warning(&format!(
                "Type change in column '{}': {} -> {}",
                column.name(),
                source_kind,
                target_kind
            ));
        }
        Ok(preserved)
    }

    /// Cell-by-cell comparison of the leading rows; every mismatch is
    /// reported, not just the first
    fn samples_match(
        &self,
        expected: &DataFrame,
        actual: &DataFrame,
    ) -> Result<bool, ValidationError> {
        let rows = self.config.sample_rows.min(expected.height());
        let mut matched = true;

        for row in 0..rows {
            if row >= actual.height() {
                return Err(ValidationError::MissingRow {
                    row,
                    height: actual.height(),
                });
            }
            for column in expected.get_columns() {
                let name = column.name().as_str();
                let source = column.get(row).unwrap_or(AnyValue::Null);
                let target = produced_column(actual, name)?
                    .get(row)
                    .unwrap_or(AnyValue::Null);

                if !self.cells_match(&source, &target) {
                    matched = false;
                    self.reporter.warning(&format!(
                        "Data mismatch at row {}, col '{}': {} != {}",
                        row,
                        name,
                        value_as_text(&source),
                        value_as_text(&target)
                    ));
                }
            }
        }
        Ok(matched)
    }

    fn cells_match(&self, source: &AnyValue, target: &AnyValue) -> bool {
        if source.is_null() && target.is_null() {
            return true;
        }
        match (value_as_number(source), value_as_number(target)) {
            (Some(a), Some(b)) => (a - b).abs() <= self.config.tolerance,
            _ => value_as_text(source) == value_as_text(target),
        }
    }
}

fn produced_column<'t>(actual: &'t DataFrame, name: &str) -> Result<&'t Column, ValidationError> {
    actual
        .column(name)
        .map_err(|_| ValidationError::MissingColumn {
            name: name.to_string(),
        })
}
