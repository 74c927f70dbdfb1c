mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use crate::input::snapshot::{JsonSnapshotStore, SnapshotError, SnapshotStore};
use crate::pipeline::stage1_scan::run_scan;
use crate::pipeline::stage2_cache::{CacheError, load_or_build};
use crate::pipeline::stage4_report::{ReportError, write_reports};

#[derive(Debug, Parser)]
#[command(name = "tournament-stats", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Aggregate result files (or reuse the snapshot) and write reports.
    Run(RunConfig),
}

#[derive(Debug, Clone, clap::Args)]
struct RunConfig {
    /// Directory holding `results_*.csv` files.
    #[arg(long = "input", default_value = "A_Magical_Code_tournament_results")]
    input_dir: PathBuf,
    /// Directory for report tables.
    #[arg(long = "out", default_value = "plots")]
    out_dir: PathBuf,
    /// Precomputed table location.
    #[arg(long, default_value = "stats.json")]
    snapshot: PathBuf,
    /// Delete the snapshot first and rescan the results directory.
    #[arg(long)]
    rebuild: bool,
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("failed to invalidate snapshot: {0}")]
    Invalidate(#[from] SnapshotError),
    #[error("failed to write reports: {0}")]
    Report(#[from] ReportError),
}

fn main() {
    logging::init_logging();
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(config) => run(&config),
    };
    if let Err(err) = result {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(config: &RunConfig) -> Result<(), RunError> {
    let store = JsonSnapshotStore::new(&config.snapshot);
    if config.rebuild {
        info!("invalidating snapshot {}", store.path().display());
        store.invalidate()?;
    }

    let gated = load_or_build(&store, || run_scan(&config.input_dir))?;
    let summary = write_reports(&gated, &config.out_dir)?;
    info!(
        "{} observations, overall mean {:.6}",
        summary.observations, summary.overall_mean
    );
    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
