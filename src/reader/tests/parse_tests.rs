//! Single-attempt parsing tests

use crate::error::ReadError;
use crate::models::ParseAttempt;
use crate::reader::parse_text;
use crate::report::{Level, MemoryReporter};
use polars::prelude::*;

fn skip_attempt() -> ParseAttempt {
    ParseAttempt::RELAXATIONS[0]
}

fn warn_attempt() -> ParseAttempt {
    ParseAttempt::RELAXATIONS[1]
}

fn quote_none_attempt() -> ParseAttempt {
    ParseAttempt::RELAXATIONS[3]
}

#[test]
fn test_parse_simple_table() {
    let reporter = MemoryReporter::new();
    let parsed = parse_text(
        "id,name,score\n1,alice,9.5\n2,bob,7.25\n",
        &ParseAttempt::STANDARD,
        &reporter,
    )
    .unwrap();

    let table = parsed.table;
    assert_eq!(table.shape(), (2, 3));
    assert_eq!(table.column("id").unwrap().dtype(), &DataType::Int64);
    assert_eq!(table.column("name").unwrap().dtype(), &DataType::String);
    assert_eq!(table.column("score").unwrap().dtype(), &DataType::Float64);
    assert_eq!(parsed.skipped_rows, 0);
}

#[test]
fn test_short_rows_are_padded() {
    let reporter = MemoryReporter::new();
    let parsed = parse_text("a,b,c\n1,2\n4,5,6\n", &ParseAttempt::STANDARD, &reporter).unwrap();

    let table = parsed.table;
    assert_eq!(table.height(), 2);
    assert_eq!(table.column("c").unwrap().null_count(), 1);
}

#[test]
fn test_long_row_is_malformed_under_standard() {
    let reporter = MemoryReporter::new();
    let result = parse_text("a,b\n1,2\n3,4,5\n", &ParseAttempt::STANDARD, &reporter);

    match result {
        Err(ReadError::Malformed {
            line,
            expected,
            found,
        }) => {
            assert_eq!(line, 3);
            assert_eq!(expected, 2);
            assert_eq!(found, 3);
        }
        other => panic!("Expected Malformed error, got {:?}", other),
    }
}

#[test]
fn test_malformed_message_names_field_counts() {
    let error = ReadError::Malformed {
        line: 4,
        expected: 3,
        found: 4,
    };
    let message = error.to_string().to_lowercase();
    assert!(message.contains("expected") && message.contains("fields"));
    assert!(error.is_structural());
}

#[test]
fn test_skip_policy_drops_long_rows_silently() {
    let reporter = MemoryReporter::new();
    let parsed = parse_text("a,b\n1,2\n3,4,5\n6,7\n", &skip_attempt(), &reporter).unwrap();

    assert_eq!(parsed.table.height(), 2);
    assert_eq!(parsed.skipped_rows, 1);
    assert!(reporter.messages(Level::Warning).is_empty());
}

#[test]
fn test_warn_policy_reports_dropped_rows() {
    let reporter = MemoryReporter::new();
    let parsed = parse_text("a,b\n1,2\n3,4,5\n", &warn_attempt(), &reporter).unwrap();

    assert_eq!(parsed.table.height(), 1);
    let warnings = reporter.messages(Level::Warning);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("line 3"));
}

#[test]
fn test_quoted_delimiter_is_one_field() {
    let reporter = MemoryReporter::new();
    let parsed = parse_text(
        "name,qty\n\"Smith, J\",2\n",
        &ParseAttempt::STANDARD,
        &reporter,
    )
    .unwrap();

    let name = parsed.table.column("name").unwrap().get(0).unwrap();
    assert_eq!(name, AnyValue::String("Smith, J"));
}

#[test]
fn test_unterminated_quote_is_not_structural() {
    let reporter = MemoryReporter::new();
    let result = parse_text(
        "id,note\n1,\"unterminated\n2,ok\n3,ok\n4,ok\n",
        &ParseAttempt::STANDARD,
        &reporter,
    );

    match result {
        Err(e @ ReadError::UnterminatedQuote { line: 2 }) => {
            assert!(!e.is_structural());
            assert_eq!(e.to_string(), "EOF inside string starting at line 2");
        }
        other => panic!("Expected UnterminatedQuote, got {:?}", other),
    }
}

#[test]
fn test_closed_multiline_and_escaped_quotes_parse() {
    let reporter = MemoryReporter::new();
    let parsed = parse_text(
        "id,note\n1,\"two\nlines\"\n2,\"say \"\"hi\"\"\"\n3,5\"3\n",
        &ParseAttempt::STANDARD,
        &reporter,
    )
    .unwrap();

    assert_eq!(parsed.table.height(), 3);
    let note = parsed.table.column("note").unwrap();
    assert_eq!(note.get(0).unwrap(), AnyValue::String("two\nlines"));
    assert_eq!(note.get(1).unwrap(), AnyValue::String("say \"hi\""));
    assert_eq!(note.get(2).unwrap(), AnyValue::String("5\"3"));
}

#[test]
fn test_open_quote_is_literal_without_quoting() {
    let reporter = MemoryReporter::new();
    let parsed = parse_text("id,note\n1,\"open\n", &quote_none_attempt(), &reporter).unwrap();

    let note = parsed.table.column("note").unwrap().get(0).unwrap();
    assert_eq!(note, AnyValue::String("\"open"));
}

#[test]
fn test_quote_none_splits_on_every_delimiter() {
    let reporter = MemoryReporter::new();
    let result = parse_text("name,qty\n\"Smith, J\",2\n", &quote_none_attempt(), &reporter);

    assert!(matches!(result, Err(ReadError::Malformed { found: 3, .. })));
}

#[test]
fn test_empty_text_has_no_columns() {
    let reporter = MemoryReporter::new();
    let result = parse_text("", &ParseAttempt::STANDARD, &reporter);
    assert!(matches!(result, Err(ReadError::Empty)));
}

#[test]
fn test_header_only_has_zero_rows() {
    let reporter = MemoryReporter::new();
    let parsed = parse_text("a,b,c\n", &ParseAttempt::STANDARD, &reporter).unwrap();
    assert_eq!(parsed.table.shape(), (0, 3));
}

#[test]
fn test_blank_lines_are_skipped() {
    let reporter = MemoryReporter::new();
    let parsed = parse_text("a,b\n\n1,2\n\n3,4\n", &ParseAttempt::STANDARD, &reporter).unwrap();
    assert_eq!(parsed.table.height(), 2);
}

#[test]
fn test_na_markers_become_missing() {
    let reporter = MemoryReporter::new();
    let parsed = parse_text(
        "a,b\nx,NA\ny,\nz,null\n",
        &ParseAttempt::STANDARD,
        &reporter,
    )
    .unwrap();
    assert_eq!(parsed.table.column("b").unwrap().null_count(), 3);
}

#[test]
fn test_duplicate_headers_are_mangled() {
    let reporter = MemoryReporter::new();
    let parsed = parse_text("x,x,\n1,2,3\n", &ParseAttempt::STANDARD, &reporter).unwrap();

    let names: Vec<String> = parsed
        .table
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(names, vec!["x", "x.1", "Unnamed: 2"]);
}

#[test]
fn test_semicolon_delimiter() {
    let reporter = MemoryReporter::new();
    let attempt = ParseAttempt::STANDARD.with_delimiter(b';');
    let parsed = parse_text("a;b\n1;2\n", &attempt, &reporter).unwrap();
    assert_eq!(parsed.table.shape(), (1, 2));
}
