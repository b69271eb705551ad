//! Downloads directory watching and per-file dispatch.
//!
//! [`DirectoryWatcher`] polls one directory, non-recursively, and reports
//! files it has not seen before; that covers files created in place and
//! files renamed or moved in. [`DownloadHandler`] takes each new file
//! through the settle delay, the transient checks and then routes it by
//! extension. Files are handled one at a time.

use crate::archive::process_archive;
use crate::config::AppConfig;
use crate::error::StartupError;
use crate::models::{FileKind, ProcessingOutcome, display_name, lowercase_extension};
use crate::processor::CsvConverter;
use crate::report::Reporter;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;
use walkdir::WalkDir;

/// Routes detected files to the converter or the archive extractor
pub struct DownloadHandler<R: Reporter> {
    config: AppConfig,
    reporter: R,
}

impl<R: Reporter> DownloadHandler<R> {
    pub fn new(config: AppConfig, reporter: R) -> Self {
        Self { config, reporter }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Announce `path`, let the download settle, then process it
    pub async fn handle(&self, path: &Path) -> ProcessingOutcome {
        let name = display_name(path);
        self.reporter.highlight(&format!("File detected: {}", name));
        self.reporter.dim(&format!(
            "Waiting {} seconds before processing {}...",
            self.config.watch.settle_delay.as_secs(),
            name
        ));
        time::sleep(self.config.watch.settle_delay).await;

        let outcome = self.process_file(path);
        debug!("{} -> {:?}", name, outcome);
        outcome
    }

    /// Process a settled file. Never fails; every path ends in an outcome.
    pub fn process_file(&self, path: &Path) -> ProcessingOutcome {
        let name = display_name(path);

        if !path.exists() {
            self.reporter
                .dim(&format!("{} no longer exists. Skipping.", name));
            return ProcessingOutcome::SkippedTransient;
        }

        let extension = lowercase_extension(path).unwrap_or_default();
        if self.config.watch.is_temp_extension(&extension) {
            self.reporter
                .dim(&format!("Ignoring temporary file: {}", name));
            return ProcessingOutcome::SkippedTransient;
        }

        match FileKind::from_path(path) {
            Some(FileKind::Csv) => CsvConverter::new(&self.config, &self.reporter).run(path),
            Some(kind) => process_archive(path, kind, &self.reporter),
            None => {
                let suffix = if extension.is_empty() {
                    String::new()
                } else {
                    format!(".{}", extension)
                };
                self.reporter.dim(&format!(
                    "File type '{}' not supported. Skipping {}.",
                    suffix, name
                ));
                ProcessingOutcome::SkippedUnsupportedType { extension }
            }
        }
    }
}

/// Snapshot-diffing watcher over a single directory
#[derive(Debug)]
pub struct DirectoryWatcher {
    dir: PathBuf,
    known: HashSet<PathBuf>,
}

impl DirectoryWatcher {
    /// Start watching `dir`; files already present are not reported
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StartupError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(StartupError::WatchDirMissing { path: dir });
        }
        let known = snapshot(&dir);
        debug!("Watching {} ({} existing files)", dir.display(), known.len());
        Ok(Self { dir, known })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files that appeared since the previous poll, in name order
    pub fn poll(&mut self) -> Vec<PathBuf> {
        let current = snapshot(&self.dir);
        let mut fresh: Vec<PathBuf> = current.difference(&self.known).cloned().collect();
        fresh.sort();
        self.known = current;
        fresh
    }
}

fn snapshot(dir: &Path) -> HashSet<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

/// Poll and dispatch until `shutdown` turns true.
///
/// Shutdown is checked between files, so a file being processed is always
/// finished first. Returns the number of files handled.
pub async fn run<R: Reporter>(
    handler: &DownloadHandler<R>,
    watcher: &mut DirectoryWatcher,
    mut shutdown: watch::Receiver<bool>,
) -> usize {
    let mut ticker = time::interval(handler.config().watch.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut handled = 0;

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = ticker.tick() => {
                for path in watcher.poll() {
                    if *shutdown.borrow() {
                        break;
                    }
                    handler.handle(&path).await;
                    handled += 1;
                }
            }
        }
    }

    debug!("Watcher stopped after {} files", handled);
    handled
}
