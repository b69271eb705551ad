//! Successful conversion tests

use super::download;
use crate::config::AppConfig;
use crate::models::ProcessingOutcome;
use crate::processor::{CsvConverter, process_csv};
use crate::report::{Level, MemoryReporter};
use crate::spreadsheet::read_spreadsheet;
use polars::prelude::*;

#[test]
fn test_valid_csv_is_replaced_by_spreadsheet() {
    let (_dir, path) = download(
        "orders.csv",
        b"order_id,customer,total,paid\n1001,Acme,250.75,True\n1002,Globex,99.5,False\n1003,Initech,12,True\n",
    );
    let config = AppConfig::default();
    let reporter = MemoryReporter::new();

    let outcome = CsvConverter::new(&config, &reporter).run(&path);

    let artifact = path.with_extension("xlsx");
    assert_eq!(
        outcome,
        ProcessingOutcome::Converted {
            artifact: artifact.clone()
        }
    );
    assert!(!path.exists());
    assert!(artifact.exists());

    let table = read_spreadsheet(&artifact).unwrap();
    assert_eq!(table.shape(), (3, 4));
    assert_eq!(
        table.column("total").unwrap().get(0).unwrap(),
        AnyValue::Float64(250.75)
    );
}

#[test]
fn test_progress_is_reported_in_order() {
    let (_dir, path) = download("small.csv", b"a,b\n1,x\n2,y\n");
    let config = AppConfig::default();
    let reporter = MemoryReporter::new();

    assert!(process_csv(&path, &config, &reporter));

    let messages: Vec<String> = reporter.entries().into_iter().map(|(_, m)| m).collect();
    let position = |needle: &str| {
        messages
            .iter()
            .position(|m| m.contains(needle))
            .unwrap_or_else(|| panic!("missing message: {}", needle))
    };

    assert!(position(">>> Processing CSV: small.csv") < position("CSV dimensions: 2 rows x 2 columns"));
    assert!(position("CSV dimensions") < position("Converted to: small.xlsx"));
    assert!(position("Converted to") < position("VALIDATION PASSED"));
    assert!(position("VALIDATION PASSED") < position("Removed original CSV file: small.csv"));
}

#[test]
fn test_latin1_csv_converts() {
    let (_dir, path) = download(
        "stations.csv",
        b"station,altitude\nZ\xFCrich,408.5\nGen\xE8ve,375.25\n",
    );
    let config = AppConfig::default();
    let reporter = MemoryReporter::new();

    assert!(process_csv(&path, &config, &reporter));

    let table = read_spreadsheet(&path.with_extension("xlsx")).unwrap();
    assert_eq!(
        table.column("station").unwrap().get(0).unwrap(),
        AnyValue::String("Zürich")
    );
}

#[test]
fn test_ragged_csv_converts_after_relaxation() {
    let (_dir, path) = download("ragged.csv", b"a,b\n1,2\n3,4,5\n6,7\n");
    let config = AppConfig::default();
    let reporter = MemoryReporter::new();

    assert!(process_csv(&path, &config, &reporter));
    assert!(reporter.contains("CSV parsed successfully using: Lenient engine with error skip"));
    assert!(reporter.messages(Level::Success).iter().any(|m| m == "Converted to: ragged.xlsx"));
}

#[test]
fn test_existing_spreadsheet_is_overwritten() {
    let (dir, path) = download("report.csv", b"x,y\n1.5,a\n2.5,b\n");
    let artifact = dir.path().join("report.xlsx");
    std::fs::write(&artifact, b"stale").unwrap();
    let config = AppConfig::default();
    let reporter = MemoryReporter::new();

    assert!(process_csv(&path, &config, &reporter));
    assert_eq!(read_spreadsheet(&artifact).unwrap().height(), 2);
}
