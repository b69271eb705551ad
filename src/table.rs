//! Table construction and cell inspection.
//!
//! A table is a polars `DataFrame` with unique, ordered column names. Both
//! the CSV reader and the spreadsheet re-reader build tables through this
//! module so that kind inference is identical on both sides of a
//! conversion: the validator compares like with like.

use crate::constants::{FALSE_MARKERS, NA_MARKERS, TRUE_MARKERS, UNNAMED_COLUMN_PREFIX};
use polars::prelude::*;
use std::collections::HashSet;

/// A typed spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Number(f64),
    Bool(bool),
    Text(String),
}

/// True if `text` is read as a missing value
pub fn is_na(text: &str) -> bool {
    NA_MARKERS.contains(&text)
}

/// Parse a finite number, tolerating surrounding whitespace
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_integer(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

fn parse_bool(text: &str) -> Option<bool> {
    let trimmed = text.trim();
    if TRUE_MARKERS.contains(&trimmed) {
        Some(true)
    } else if FALSE_MARKERS.contains(&trimmed) {
        Some(false)
    } else {
        None
    }
}

/// Make header names unique and non-empty.
///
/// Empty names become `Unnamed: {index}`; repeats get `.1`, `.2`, ...
/// suffixes, skipping any suffix already taken by another column.
pub fn unique_headers<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let base: Vec<String> = raw
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let name = name.as_ref();
            if name.trim().is_empty() {
                format!("{}{}", UNNAMED_COLUMN_PREFIX, index)
            } else {
                name.to_string()
            }
        })
        .collect();

    let mut taken: HashSet<String> = HashSet::with_capacity(base.len());
    let mut unique = Vec::with_capacity(base.len());
    for name in base {
        let mut candidate = name.clone();
        let mut suffix = 1;
        while taken.contains(&candidate) {
            candidate = format!("{}.{}", name, suffix);
            suffix += 1;
        }
        taken.insert(candidate.clone());
        unique.push(candidate);
    }
    unique
}

/// Infer a column's kind from its text cells (`None` = missing).
///
/// Integers with gaps widen to floats; a column with no present value is
/// an all-missing float column.
pub fn text_column(name: &str, values: Vec<Option<String>>) -> Column {
    let present: Vec<&str> = values.iter().flatten().map(String::as_str).collect();
    let has_missing = present.len() < values.len();
    let name = PlSmallStr::from(name);

    if present.is_empty() {
        let nulls: Vec<Option<f64>> = vec![None; values.len()];
        return Column::from(Series::new(name, nulls));
    }

    if present.iter().all(|v| parse_integer(v).is_some()) {
        if has_missing {
            let floats: Vec<Option<f64>> = values
                .iter()
                .map(|v| v.as_deref().and_then(parse_integer).map(|i| i as f64))
                .collect();
            return Column::from(Series::new(name, floats));
        }
        let ints: Vec<Option<i64>> = values
            .iter()
            .map(|v| v.as_deref().and_then(parse_integer))
            .collect();
        return Column::from(Series::new(name, ints));
    }

    if present.iter().all(|v| parse_number(v).is_some()) {
        let floats: Vec<Option<f64>> = values
            .iter()
            .map(|v| v.as_deref().and_then(parse_number))
            .collect();
        return Column::from(Series::new(name, floats));
    }

    if present.iter().all(|v| parse_bool(v).is_some()) {
        let bools: Vec<Option<bool>> = values
            .iter()
            .map(|v| v.as_deref().and_then(parse_bool))
            .collect();
        return Column::from(Series::new(name, bools));
    }

    Column::from(Series::new(name, values))
}

/// Infer a column's kind from typed spreadsheet cells.
///
/// Numbers that are all integral (and gap-free) read back as integers.
/// Mixed columns fall back to text.
pub fn cell_column(name: &str, cells: Vec<Cell>) -> Column {
    let name = PlSmallStr::from(name);
    let present: Vec<&Cell> = cells.iter().filter(|c| **c != Cell::Missing).collect();
    let has_missing = present.len() < cells.len();

    if present.is_empty() {
        let nulls: Vec<Option<f64>> = vec![None; cells.len()];
        return Column::from(Series::new(name, nulls));
    }

    if present.iter().all(|c| matches!(c, Cell::Number(_))) {
        let numbers: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Cell::Number(v) => Some(*v),
                _ => None,
            })
            .collect();
        let integral = numbers.iter().flatten().all(|v| is_integral(*v));
        if integral && !has_missing {
            let ints: Vec<Option<i64>> = numbers.iter().map(|v| v.map(|v| v as i64)).collect();
            return Column::from(Series::new(name, ints));
        }
        return Column::from(Series::new(name, numbers));
    }

    if present.iter().all(|c| matches!(c, Cell::Bool(_))) {
        let bools: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                Cell::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        return Column::from(Series::new(name, bools));
    }

    let texts: Vec<Option<String>> = cells
        .iter()
        .map(|c| match c {
            Cell::Missing => None,
            Cell::Number(v) => Some(number_text(*v)),
            Cell::Bool(true) => Some("True".to_string()),
            Cell::Bool(false) => Some("False".to_string()),
            Cell::Text(t) => Some(t.clone()),
        })
        .collect();
    Column::from(Series::new(name, texts))
}

/// Whole number small enough to survive an `i64` round trip
fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15
}

fn number_text(value: f64) -> String {
    if is_integral(value) {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Assemble columns into a table
pub fn build_table(columns: Vec<Column>) -> PolarsResult<DataFrame> {
    DataFrame::new(columns)
}

/// Integer and floating-point kinds are interchangeable for validation
pub fn is_numeric_kind(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Numeric view of a cell, if it holds a number
pub fn value_as_number(value: &AnyValue) -> Option<f64> {
    match value {
        AnyValue::Int8(v) => Some(*v as f64),
        AnyValue::Int16(v) => Some(*v as f64),
        AnyValue::Int32(v) => Some(*v as f64),
        AnyValue::Int64(v) => Some(*v as f64),
        AnyValue::UInt8(v) => Some(*v as f64),
        AnyValue::UInt16(v) => Some(*v as f64),
        AnyValue::UInt32(v) => Some(*v as f64),
        AnyValue::UInt64(v) => Some(*v as f64),
        AnyValue::Float32(v) => Some(*v as f64),
        AnyValue::Float64(v) => Some(*v),
        _ => None,
    }
}

/// Plain text rendering of a cell; missing renders as `nan`
pub fn value_as_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => "nan".to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(true) => "True".to_string(),
        AnyValue::Boolean(false) => "False".to_string(),
        other => match value_as_number(other) {
            Some(number) => format!("{}", number),
            None => format!("{}", other),
        },
    }
}
