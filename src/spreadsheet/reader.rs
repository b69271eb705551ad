//! Workbook to table loading

use crate::error::ValidationError;
use crate::table::{self, Cell, is_na};
use calamine::{Data, Reader, Xlsx, open_workbook};
use polars::prelude::DataFrame;
use std::path::Path;

/// Load the first worksheet of `path`, first row as headers.
pub fn read_spreadsheet(path: &Path) -> Result<DataFrame, ValidationError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ValidationError::NoWorksheet)??;

    let mut rows = range.rows();
    let header: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(|cell| cell.to_string()).collect(),
        None => return Err(ValidationError::NoWorksheet),
    };
    let names = table::unique_headers(&header);

    let mut columns: Vec<Vec<Cell>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (index, cells) in columns.iter_mut().enumerate() {
            cells.push(row.get(index).map(to_cell).unwrap_or(Cell::Missing));
        }
    }

    let columns = names
        .iter()
        .zip(columns)
        .map(|(name, cells)| table::cell_column(name, cells))
        .collect();
    Ok(table::build_table(columns)?)
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Missing,
        Data::String(text) if is_na(text) => Cell::Missing,
        Data::String(text) => Cell::Text(text.clone()),
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Bool(flag) => Cell::Bool(*flag),
        other => Cell::Text(other.to_string()),
    }
}
