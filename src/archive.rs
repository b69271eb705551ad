//! Archive extraction for downloaded `.zip` and `.7z` files.
//!
//! Archives are unpacked next to themselves and never deleted. A file that
//! is not a readable archive is reported as corrupt, separately from
//! ordinary I/O failures.

use crate::error::{ProcessingError, Result};
use crate::models::{FileKind, ProcessingOutcome, display_name};
use crate::report::Reporter;
use std::fs::File;
use std::path::{Path, PathBuf};
use zip::ZipArchive;
use zip::result::ZipError;

/// Extract every entry of `path` into `destination`
pub fn extract_archive(path: &Path, kind: FileKind, destination: &Path) -> Result<()> {
    match kind {
        FileKind::Zip => extract_zip(path, destination),
        FileKind::SevenZip => extract_seven_zip(path, destination),
        FileKind::Csv => Err(ProcessingError::unexpected(path, "not an archive")),
    }
}

fn extract_zip(path: &Path, destination: &Path) -> Result<()> {
    let file = File::open(path).map_err(|e| ProcessingError::io(path, e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| zip_error(path, e))?;
    archive
        .extract(destination)
        .map_err(|e| zip_error(path, e))
}

fn zip_error(path: &Path, error: ZipError) -> ProcessingError {
    match error {
        ZipError::InvalidArchive(_) | ZipError::UnsupportedArchive(_) => {
            ProcessingError::ArchiveCorrupt {
                path: path.to_path_buf(),
                format: FileKind::Zip.label().to_string(),
            }
        }
        ZipError::Io(e) => ProcessingError::io(path, e),
        other => ProcessingError::unexpected(path, other.to_string()),
    }
}

fn extract_seven_zip(path: &Path, destination: &Path) -> Result<()> {
    // Surface a missing or unreadable file as I/O rather than corruption
    File::open(path).map_err(|e| ProcessingError::io(path, e))?;

    sevenz_rust::decompress_file(path, destination).map_err(|e| match e {
        sevenz_rust::Error::BadSignature(_) => ProcessingError::ArchiveCorrupt {
            path: path.to_path_buf(),
            format: FileKind::SevenZip.label().to_string(),
        },
        other => ProcessingError::unexpected(path, other.to_string()),
    })
}

/// Extract `path` into its own directory and report the result
pub fn process_archive(path: &Path, kind: FileKind, reporter: &dyn Reporter) -> ProcessingOutcome {
    let name = display_name(path);
    reporter.processing_started(&name, kind);

    let destination: PathBuf = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    match extract_archive(path, kind, &destination) {
        Ok(()) => {
            reporter.success(&format!(
                "Decompressed {} to {}",
                name,
                destination.display()
            ));
            ProcessingOutcome::Extracted { destination }
        }
        Err(ProcessingError::ArchiveCorrupt { format, .. }) => {
            reporter.error(&format!(
                "Failed to decompress {}. Not a valid {} archive.",
                name, format
            ));
            ProcessingOutcome::ExtractionFailed {
                reason: format!("not a valid {} archive", format),
            }
        }
        Err(e) => {
            reporter.error(&format!("Failed to decompress {}. Error: {}", name, e));
            ProcessingOutcome::ExtractionFailed {
                reason: e.to_string(),
            }
        }
    }
}
