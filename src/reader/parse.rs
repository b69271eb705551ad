//! Single parse attempt over decoded text.

use crate::error::ReadError;
use crate::models::{BadLinePolicy, Engine, ParseAttempt, QuotingMode};
use crate::report::Reporter;
use crate::table::{self, is_na};
use csv::ReaderBuilder;
use polars::prelude::DataFrame;

/// Rows accepted and rejected by one attempt
#[derive(Debug)]
pub struct ParsedTable {
    pub table: DataFrame,
    pub skipped_rows: usize,
}

/// Parse `text` as a headed CSV under one strategy.
///
/// Short rows are padded with missing values. Long rows are a
/// [`ReadError::Malformed`] unless the attempt is lenient, in which case
/// they are dropped (and reported under the warn policy). Reading treats
/// `QUOTE_ALL` like minimal quoting; only `QUOTE_NONE` changes how fields
/// are split. A quoted field still open at the end of the text is a
/// [`ReadError::UnterminatedQuote`].
pub fn parse_text(
    text: &str,
    attempt: &ParseAttempt,
    reporter: &dyn Reporter,
) -> Result<ParsedTable, ReadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(attempt.delimiter)
        .quoting(attempt.quoting != QuotingMode::None)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record?,
        None => return Err(ReadError::Empty),
    };
    let mut last_start = header.position().cloned();
    let names = table::unique_headers(&header.iter().collect::<Vec<_>>());
    let width = names.len();

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    let mut skipped_rows = 0;

    for record in records {
        let record = record?;
        last_start = record.position().cloned();
        if record.len() > width {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let rejected = ReadError::Malformed {
                line,
                expected: width,
                found: record.len(),
            };
            match (attempt.engine, attempt.bad_lines) {
                (Engine::Fast, _) | (_, BadLinePolicy::Error) => return Err(rejected),
                (Engine::Lenient, BadLinePolicy::Skip) => {}
                (Engine::Lenient, BadLinePolicy::Warn) => {
                    reporter.warning(&format!("Skipping line {}: {}", line, rejected));
                }
            }
            skipped_rows += 1;
            continue;
        }

        for (index, values) in columns.iter_mut().enumerate() {
            let value = record
                .get(index)
                .filter(|field| !is_na(field))
                .map(str::to_string);
            values.push(value);
        }
    }

    if attempt.quoting != QuotingMode::None {
        if let Some(start) = last_start {
            let tail = usize::try_from(start.byte())
                .ok()
                .and_then(|offset| text.get(offset..))
                .unwrap_or_default();
            if ends_inside_quotes(tail, attempt.delimiter) {
                return Err(ReadError::UnterminatedQuote { line: start.line() });
            }
        }
    }

    let columns = names
        .iter()
        .zip(columns)
        .map(|(name, values)| table::text_column(name, values))
        .collect();
    let table = table::build_table(columns)?;

    Ok(ParsedTable {
        table,
        skipped_rows,
    })
}

/// True when `tail` ends while a quoted field is still open.
///
/// Quotes only open a field at its first byte; elsewhere they are literal.
fn ends_inside_quotes(tail: &str, delimiter: u8) -> bool {
    let mut in_quotes = false;
    let mut field_start = true;
    let mut bytes = tail.bytes().peekable();

    while let Some(byte) = bytes.next() {
        if in_quotes {
            if byte == b'"' {
                if bytes.peek() == Some(&b'"') {
                    bytes.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }
        match byte {
            b'"' if field_start => {
                in_quotes = true;
                field_start = false;
            }
            b'\n' | b'\r' => field_start = true,
            b if b == delimiter => field_start = true,
            _ => field_start = false,
        }
    }
    in_quotes
}
