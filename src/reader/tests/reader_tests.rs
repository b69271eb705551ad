//! Encoding and relaxation fallback tests

use super::write_fixture;
use crate::config::ReaderConfig;
use crate::error::ProcessingError;
use crate::models::{BadLinePolicy, Engine, ParseAttempt};
use crate::reader::{CsvReader, read_csv};
use crate::report::{Level, MemoryReporter};
use polars::prelude::*;

#[test]
fn test_ascii_file_reads_with_standard_parser() {
    let (_dir, path) = write_fixture("plain.csv", b"id,label\n1,a\n2,b\n");
    let reporter = MemoryReporter::new();

    let outcome = read_csv(&path, &ReaderConfig::default(), &reporter).unwrap();

    assert_eq!(outcome.encoding, "ascii");
    assert_eq!(outcome.attempt, ParseAttempt::STANDARD);
    assert_eq!(outcome.table.shape(), (2, 2));
    assert!(reporter.contains("Detected encoding: ascii (confidence: 1.00)"));
    assert!(reporter.contains("Successfully read CSV with encoding: ascii"));
}

#[test]
fn test_latin1_only_file_falls_through_to_latin1() {
    let (_dir, path) = write_fixture(
        "cities.csv",
        b"city,population\nM\xFCnchen,1488000\nK\xF6ln,1086000\n",
    );
    let reporter = MemoryReporter::new();

    let outcome = read_csv(&path, &ReaderConfig::default(), &reporter).unwrap();

    assert_eq!(outcome.encoding, "latin-1");
    assert!(outcome.guess.confidence <= 0.7);
    assert!(reporter.contains("Low confidence encoding detection"));
    assert!(reporter.contains("Successfully read CSV with encoding: latin-1"));

    let city = outcome.table.column("city").unwrap().get(0).unwrap();
    assert_eq!(city, AnyValue::String("München"));
}

#[test]
fn test_utf8_file_is_detected_confidently() {
    let (_dir, path) = write_fixture(
        "names.csv",
        "name,age\nJosé,31\nRenée,44\nZoë,27\nSøren,52\nÅsa,38\nMüller,61\n".as_bytes(),
    );
    let reporter = MemoryReporter::new();

    let outcome = read_csv(&path, &ReaderConfig::default(), &reporter).unwrap();

    assert_eq!(outcome.encoding, "utf-8");
    assert!(outcome.guess.confidence > 0.7);
    assert_eq!(outcome.table.height(), 6);
}

#[test]
fn test_ragged_row_recovers_via_relaxation() {
    let (_dir, path) = write_fixture("ragged.csv", b"a,b,c\n1,2,3\n4,5,6,7\n8,9,10\n");
    let reporter = MemoryReporter::new();

    let outcome = read_csv(&path, &ReaderConfig::default(), &reporter).unwrap();

    assert_eq!(outcome.encoding, "ascii");
    assert_eq!(outcome.attempt.engine, Engine::Lenient);
    assert_eq!(outcome.attempt.bad_lines, BadLinePolicy::Skip);
    assert_eq!(outcome.table.height(), 2);
    assert_eq!(outcome.skipped_rows, 1);

    assert!(reporter.contains("Malformed CSV detected with ascii"));
    assert!(reporter.contains("Attempting fallback parsing strategies..."));
    assert_eq!(
        reporter.messages(Level::Success),
        vec!["CSV parsed successfully using: Lenient engine with error skip"]
    );
}

#[test]
fn test_zero_byte_file_exhausts_every_encoding() {
    let (_dir, path) = write_fixture("empty.csv", b"");
    let reporter = MemoryReporter::new();

    let result = read_csv(&path, &ReaderConfig::default(), &reporter);

    assert!(matches!(result, Err(ProcessingError::Exhausted { .. })));
    assert!(reporter.contains("Failed to read CSV with any encoding"));
    // Detector has no guess, so the fallback list is tried as-is
    assert_eq!(
        reporter
            .messages(Level::Error)
            .iter()
            .filter(|m| m.starts_with("Error reading CSV with"))
            .count(),
        4
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let (dir, _) = write_fixture("present.csv", b"a\n1\n");
    let reporter = MemoryReporter::new();

    let result = read_csv(
        &dir.path().join("absent.csv"),
        &ReaderConfig::default(),
        &reporter,
    );

    assert!(matches!(result, Err(ProcessingError::Io { .. })));
}

#[test]
fn test_candidate_encodings_are_deduplicated_in_order() {
    let config = ReaderConfig::default();
    let reporter = MemoryReporter::new();
    let reader = CsvReader::new(&config, &reporter);

    assert_eq!(
        reader.candidate_encodings("utf-8"),
        vec!["utf-8", "latin-1", "cp1252", "iso-8859-1"]
    );
    assert_eq!(
        reader.candidate_encodings("windows-1252"),
        vec!["windows-1252", "utf-8", "latin-1", "cp1252", "iso-8859-1"]
    );
}

#[test]
fn test_unknown_encoding_label_moves_to_next_encoding() {
    let (_dir, path) = write_fixture("plain.csv", b"a,b\n1,2\n");
    let config = ReaderConfig {
        default_encoding: "klingon".to_string(),
        fallback_encodings: vec!["utf-8".to_string()],
        ..Default::default()
    }
    .with_confidence_threshold(1.0);
    let reporter = MemoryReporter::new();

    let outcome = CsvReader::new(&config, &reporter).read(&path).unwrap();

    assert_eq!(outcome.encoding, "utf-8");
    assert!(reporter.contains("Error reading CSV with klingon"));
}

#[test]
fn test_unterminated_quote_exhausts_every_encoding() {
    let (_dir, path) = write_fixture(
        "notes.csv",
        b"id,note\n1,\"unterminated\n2,ok\n3,ok\n4,ok\n",
    );
    let reporter = MemoryReporter::new();

    let result = read_csv(&path, &ReaderConfig::default(), &reporter);

    assert!(matches!(result, Err(ProcessingError::Exhausted { .. })));
    let errors = reporter.messages(Level::Error);
    let attempts: Vec<&String> = errors
        .iter()
        .filter(|m| m.starts_with("Error reading CSV with"))
        .collect();
    assert_eq!(
        attempts,
        vec![
            "Error reading CSV with ascii: EOF inside string starting at line 2",
            "Error reading CSV with utf-8: EOF inside string starting at line 2",
            "Error reading CSV with latin-1: EOF inside string starting at line 2",
            "Error reading CSV with cp1252: EOF inside string starting at line 2",
            "Error reading CSV with iso-8859-1: EOF inside string starting at line 2",
        ]
    );
    assert_eq!(errors.last().unwrap(), "Failed to read CSV with any encoding");
    // Not a field-count problem, so no relaxation is attempted
    assert!(!reporter.contains("Attempting fallback parsing strategies..."));
}
