//! Tests for the resilient CSV reader
//!
//! Covers single parse attempts and the encoding/relaxation fallback walk.

pub mod parse_tests;
pub mod reader_tests;

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Write `bytes` to `name` inside a fresh temporary directory
pub fn write_fixture(name: &str, bytes: &[u8]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    (temp_dir, path)
}
