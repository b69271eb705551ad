//! Command-line argument definitions
//!
//! Running without arguments watches the user's Downloads directory with
//! default settings. Flags adjust the watch; `convert` processes a single
//! file once and exits.

use crate::config::{AppConfig, WatchConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Watches a downloads folder, converting CSV files to XLSX and unpacking archives
#[derive(Debug, Clone, Parser)]
#[command(
    name = "downloads-tidy",
    version,
    about = "Convert downloaded CSV files to XLSX with integrity validation and extract archives",
    long_about = "Watches a downloads directory. New CSV files are converted to XLSX next to \
                  the original, the result is re-read and compared with the source, and the \
                  CSV is removed only when every check passes. New .zip and .7z archives are \
                  extracted into the same directory."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory to watch instead of the user's Downloads folder
    #[arg(long = "watch-dir", value_name = "PATH", global = true)]
    pub watch_dir: Option<PathBuf>,

    /// Seconds to wait after a file appears before touching it
    #[arg(long = "settle-secs", value_name = "SECONDS", global = true)]
    pub settle_secs: Option<u64>,

    /// Append-mode log file (defaults to ./file_processing.log)
    #[arg(long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Write debug-level events to the log file
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Watch the directory until interrupted (default)
    Watch,
    /// Convert a single CSV file and exit
    Convert {
        /// CSV file to convert
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Args {
    /// The subcommand to run, defaulting to watching
    pub fn get_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Watch)
    }

    /// Settings with the flags applied over the defaults
    pub fn to_config(&self) -> AppConfig {
        let mut watch = WatchConfig::default();
        if let Some(dir) = &self.watch_dir {
            watch = watch.with_watch_dir(dir.clone());
        }
        if let Some(secs) = self.settle_secs {
            watch = watch.with_settle_delay(Duration::from_secs(secs));
        }

        let config = AppConfig::default().with_watch(watch);
        match &self.log_file {
            Some(path) => config.with_log_file(path.clone()),
            None => config,
        }
    }
}
