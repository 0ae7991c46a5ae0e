//! Dedupe subcommand - sort a CSV by its first column and drop repeats

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use pmscan_core::fmt_num;
use pmscan_pubmed::dedupe_csv;

use super::{prepare_output, print_summary};

#[derive(Args, Debug)]
pub struct DedupeArgs {
    /// CSV file with a header row
    pub input: PathBuf,

    /// Output file (default: replace INPUT)
    pub output: Option<PathBuf>,
}

pub fn run(args: DedupeArgs) -> Result<()> {
    if let Some(output) = &args.output {
        prepare_output(output)?;
    }

    let summary = dedupe_csv(&args.input, args.output.as_deref())?;

    print_summary(
        "Dedupe",
        &[
            ("Rows", fmt_num(summary.original)),
            ("Kept", fmt_num(summary.kept)),
            ("Removed", fmt_num(summary.removed)),
            ("Output", summary.output.display().to_string()),
        ],
    );

    Ok(())
}
