//! Numeric precision normalizer.
//!
//! Text columns whose values are all numbers, at least one of them
//! fractional, are stored as floats so the spreadsheet keeps them numeric.
//! Text columns of whole numbers stay text: they are treated as
//! identifiers (zip codes, zero-padded ids) whose leading zeros would be
//! lost. This is a heuristic and will occasionally keep a genuinely
//! numeric column as text.

use crate::table::parse_number;
use polars::prelude::*;
use tracing::debug;

/// Return a copy of `table` with fractional numeric text columns coerced.
///
/// Never fails; a column that cannot be rebuilt is left unchanged.
pub fn preserve_numeric_precision(table: &DataFrame) -> DataFrame {
    let columns: Vec<Column> = table
        .get_columns()
        .iter()
        .map(|column| coerce_column(column).unwrap_or_else(|| column.clone()))
        .collect();

    match DataFrame::new(columns) {
        Ok(normalized) => normalized,
        Err(e) => {
            debug!("Normalization skipped: {}", e);
            table.clone()
        }
    }
}

/// Float form of a text column, or `None` to keep it as it is
fn coerce_column(column: &Column) -> Option<Column> {
    if column.dtype() != &DataType::String {
        return None;
    }
    let values = column.as_materialized_series().str().ok()?;

    let present = values.len() - values.null_count();
    let coerced: Vec<Option<f64>> = values
        .into_iter()
        .map(|value| value.and_then(parse_number))
        .collect();
    let numeric = coerced.iter().flatten().count();

    if numeric == 0 || numeric != present {
        return None;
    }
    if coerced.iter().flatten().all(|v| v.fract() == 0.0) {
        return None;
    }

    debug!("Column '{}' stored as floating point", column.name());
    Some(Column::from(Series::new(column.name().clone(), coerced)))
}
