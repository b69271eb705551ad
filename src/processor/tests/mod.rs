//! Tests for the conversion orchestrator
//!
//! Each test writes a CSV into a temporary directory and inspects what is
//! left on disk afterwards.

pub mod basic_processing;

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Write `contents` to `name` inside a fresh directory
pub fn download(name: &str, contents: &[u8]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    (dir, path)
}
