//! Summary subcommand - list every article of the matched exports

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;
use pmscan_core::{SharedProgress, fmt_num};
use pmscan_pubmed::summary::{render_samples, run_summary, total_articles, write_report};

use super::{prepare_output, print_summary};

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Glob pattern for export files, relative to the input directory
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Articles previewed per file
    #[arg(short, long)]
    pub samples: Option<usize>,

    /// Abstract characters shown in the preview
    #[arg(long)]
    pub abstract_chars: Option<usize>,

    /// Report file (default: <output-dir>/pubmed_summary.txt)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(
    args: SummaryArgs,
    mut config: pmscan_pubmed::Config,
    progress: &SharedProgress,
) -> Result<()> {
    let start = Instant::now();

    if let Some(pattern) = args.pattern {
        config.pattern = pattern;
    }
    if let Some(samples) = args.samples {
        config.samples.max_articles = samples;
    }
    if let Some(chars) = args.abstract_chars {
        config.samples.abstract_chars = chars;
    }
    let report_path = args.output.unwrap_or_else(|| config.summary_report_path());

    let digests = run_summary(&config, progress)?;
    if digests.is_empty() {
        progress.println("No XML files were successfully processed.");
        return Ok(());
    }

    print!("{}", render_samples(&digests, config.samples));

    prepare_output(&report_path)?;
    write_report(&digests, &report_path)?;
    log::info!("Summary saved to: {}", report_path.display());

    print_summary(
        "Summary",
        &[
            ("Files", digests.len().to_string()),
            ("Articles", fmt_num(total_articles(&digests))),
            ("Report", report_path.display().to_string()),
            ("Time", format!("{:.1}s", start.elapsed().as_secs_f64())),
        ],
    );

    Ok(())
}
