//! Command implementations for the CLI
//!
//! Owns everything the library leaves to the binary: the terminal panels,
//! the tokio runtime and Ctrl+C handling.

use crate::cli::args::{Args, Command};
use crate::config::AppConfig;
use crate::models::display_name;
use crate::processor::CsvConverter;
use crate::report::{ConsoleReporter, Reporter, setup_logging};
use crate::watcher::{DirectoryWatcher, DownloadHandler, run};
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;
use tokio::sync::watch;
use tracing::{error, info};

const BANNER: &str = r"
   ==========================================================

     ___   _____      ___  _ _    ___   _   ___  ___
    |   \ / _ \ \    / / \| | |  / _ \ /_\ |   \/ __|
    | |) | (_) \ \/\/ /| .` | |_| (_) / _ \| |) \__ \
    |___/ \___/ \_/\_/ |_|\_|____\___/_/ \_\___/|___/
                         T I D Y

        CSV to XLSX with Data Integrity Validation

   ==========================================================
";

/// Run the command selected by `args`.
///
/// Returns `Ok(false)` when a single-file conversion did not complete.
pub fn execute(args: Args) -> Result<bool> {
    let config = args.to_config();
    config.validate()?;

    let log_file = config.log_file_path();
    setup_logging(&log_file, args.verbose)
        .with_context(|| format!("Failed to set up logging to {}", log_file.display()))?;
    info!("Logging to {}", log_file.display());

    match args.get_command() {
        Command::Watch => {
            watch_downloads(config)?;
            Ok(true)
        }
        Command::Convert { file } => Ok(convert_once(&file, &config)),
    }
}

/// Convert one file with console output
pub fn convert_once(path: &Path, config: &AppConfig) -> bool {
    let reporter = ConsoleReporter::new();
    let converted = CsvConverter::new(config, &reporter).process_csv(path);
    if !converted {
        reporter.warning(&format!("{} was not converted", display_name(path)));
    }
    converted
}

/// Watch the configured directory until Ctrl+C
pub fn watch_downloads(config: AppConfig) -> Result<()> {
    display_banner();
    let reporter = ConsoleReporter::new();

    let mut watcher = match DirectoryWatcher::new(&config.watch.watch_dir) {
        Ok(watcher) => watcher,
        Err(e) => {
            reporter.error(&format!("{}. Exiting.", e));
            return Err(e.into());
        }
    };
    display_startup_info(watcher.dir());

    let runtime = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
    let handled = runtime.block_on(async {
        let (shutdown, receiver) = watch::channel(false);
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to install Ctrl+C handler: {}", e);
                // Keep the sender alive so the watcher is not stopped
                std::future::pending::<()>().await;
            }
            let _ = shutdown.send(true);
        });

        let handler = DownloadHandler::new(config, reporter);
        run(&handler, &mut watcher, receiver).await
    });

    info!("Watcher stopped by user after {} files", handled);
    display_shutdown();
    Ok(())
}

pub fn display_banner() {
    println!("{}", BANNER.cyan().bold());
    println!();
}

pub fn display_startup_info(watch_dir: &Path) {
    println!("{}", "── System Status ─────────────────────────────".cyan());
    println!("  {} {}", "Monitoring:".cyan().bold(), watch_dir.display());
    println!("  {} {}", "Status:".cyan().bold(), "Active".green().bold());
    println!("  {}", "Press Ctrl+C to stop".dimmed());
    println!("{}", "──────────────────────────────────────────────".cyan());
    println!();
}

pub fn display_shutdown() {
    println!();
    println!("{}", "── Shutdown ──────────────────────────────────".yellow());
    println!("  {}", "Watcher stopped by user".yellow().bold());
    println!("  {}", "All pending operations completed".dimmed());
    println!("{}", "──────────────────────────────────────────────".yellow());
}
