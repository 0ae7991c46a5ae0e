//! Ids subcommand - export ArticleIdList identifiers to CSV

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;
use pmscan_core::{SharedProgress, fmt_num};
use pmscan_pubmed::ids::{IdStats, render_summary, run_ids, write_csv};

use super::{SeriesArgs, prepare_output, print_summary};

#[derive(Args, Debug)]
pub struct IdsArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// CSV file (default: <output-dir>/article_ids.csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: IdsArgs, mut config: pmscan_pubmed::Config, progress: &SharedProgress) -> Result<()> {
    let start = Instant::now();

    config.series = args.series.apply(config.series)?;
    let csv_path = args.output.unwrap_or_else(|| config.ids_csv_path());

    let extraction = run_ids(&config, progress)?;
    if extraction.records.is_empty() {
        progress.println("No ArticleIdList entries found");
        return Ok(());
    }

    prepare_output(&csv_path)?;
    let shape = write_csv(&extraction.records, &csv_path)?;
    log::info!("Saved {} rows to {}", shape.rows, csv_path.display());

    let stats = IdStats::collect(&extraction.records);
    print!("{}", render_summary(&extraction.records, &stats));

    print_summary(
        "Article IDs",
        &[
            (
                "Files",
                format!(
                    "{} processed ({} missing, {} failed)",
                    extraction.files_processed, extraction.files_missing, extraction.files_failed
                ),
            ),
            ("Entries", fmt_num(shape.rows)),
            ("Columns", shape.columns.to_string()),
            ("Output", csv_path.display().to_string()),
            ("Time", format!("{:.1}s", start.elapsed().as_secs_f64())),
        ],
    );

    Ok(())
}
