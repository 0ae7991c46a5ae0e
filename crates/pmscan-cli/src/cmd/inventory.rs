//! Inventory subcommand - check the numbered export series

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pmscan_core::{SharedProgress, fmt_num, write_atomic};
use pmscan_pubmed::inventory::{render_report, run_inventory};

use super::{SeriesArgs, prepare_output, print_summary};

#[derive(Args, Debug)]
pub struct InventoryArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Report file (default: <output-dir>/xml_file_summary.txt)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(
    args: InventoryArgs,
    mut config: pmscan_pubmed::Config,
    progress: &SharedProgress,
) -> Result<()> {
    config.series = args.series.apply(config.series)?;
    let report_path = args
        .output
        .unwrap_or_else(|| config.inventory_report_path());

    log::info!("Checking PubMed XML files in {}", config.input_dir.display());

    let inventory = run_inventory(&config, progress)?;

    prepare_output(&report_path)?;
    write_atomic(&report_path, &render_report(&inventory))
        .with_context(|| format!("Failed to write {}", report_path.display()))?;
    log::info!("Summary saved to: {}", report_path.display());

    print_summary(
        "Inventory",
        &[
            ("Expected", inventory.entries.len().to_string()),
            ("Found", inventory.found().count().to_string()),
            ("Missing", inventory.missing().count().to_string()),
            ("Failed", inventory.failed().count().to_string()),
            ("Articles", fmt_num(inventory.total_articles())),
            ("Report", report_path.display().to_string()),
            ("Time", format!("{:.1}s", inventory.elapsed.as_secs_f64())),
        ],
    );

    Ok(())
}
