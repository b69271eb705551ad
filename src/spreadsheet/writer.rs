//! Table to workbook serialization

use crate::error::{ProcessingError, Result};
use crate::table::{value_as_number, value_as_text};
use polars::prelude::*;
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::debug;

/// Write `table` to `path` as a single-sheet workbook.
///
/// Column order is preserved and missing values become empty cells.
/// Floats are stored as full doubles; non-finite values cannot be stored
/// as numbers and are written as text.
pub fn write_spreadsheet(table: &DataFrame, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    fill_worksheet(worksheet, table).map_err(|source| ProcessingError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    workbook.save(path).map_err(|source| ProcessingError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "Wrote {} rows x {} columns to {}",
        table.height(),
        table.width(),
        path.display()
    );
    Ok(())
}

fn fill_worksheet(worksheet: &mut Worksheet, table: &DataFrame) -> std::result::Result<(), XlsxError> {
    let header = Format::new().set_bold();

    for (index, column) in table.get_columns().iter().enumerate() {
        let col = ColNum::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)?;
        worksheet.write_string_with_format(0, col, column.name().as_str(), &header)?;

        let series = column.as_materialized_series().rechunk();
        for (offset, value) in series.iter().enumerate() {
            let row = RowNum::try_from(offset + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
            write_cell(worksheet, row, col, &value)?;
        }
    }
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    value: &AnyValue,
) -> std::result::Result<(), XlsxError> {
    match value {
        AnyValue::Null => {}
        AnyValue::Boolean(flag) => {
            worksheet.write_boolean(row, col, *flag)?;
        }
        AnyValue::String(text) => {
            worksheet.write_string(row, col, *text)?;
        }
        other => match value_as_number(other) {
            Some(number) if number.is_finite() => {
                worksheet.write_number(row, col, number)?;
            }
            _ => {
                worksheet.write_string(row, col, value_as_text(other))?;
            }
        },
    }
    Ok(())
}
