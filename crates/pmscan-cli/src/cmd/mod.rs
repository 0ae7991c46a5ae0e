//! Subcommands

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use pmscan_core::ExpectedSeries;

use crate::config::validate_series;

pub mod dedupe;
pub mod ids;
pub mod inventory;
pub mod summary;

/// Overrides for the numbered export series
#[derive(Args, Debug, Default)]
pub struct SeriesArgs {
    /// First block start (x0 of the first file)
    #[arg(long)]
    pub first: Option<usize>,

    /// Last block start, inclusive
    #[arg(long)]
    pub last: Option<usize>,

    /// Records per file
    #[arg(long)]
    pub step: Option<usize>,
}

impl SeriesArgs {
    pub fn apply(&self, series: ExpectedSeries) -> Result<ExpectedSeries> {
        validate_series(ExpectedSeries {
            first: self.first.unwrap_or(series.first),
            last: self.last.unwrap_or(series.last),
            step: self.step.unwrap_or(series.step),
        })
    }
}

/// Create the parent directory of an output file
pub fn prepare_output(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display())),
        _ => Ok(()),
    }
}

pub fn print_summary(title: &str, rows: &[(&str, String)]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new(title).fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    eprintln!("\n{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_overrides() {
        let args = SeriesArgs {
            last: Some(200),
            ..Default::default()
        };
        let series = args.apply(ExpectedSeries::default()).unwrap();
        assert_eq!(series.first, 0);
        assert_eq!(series.last, 200);
        assert_eq!(series.step, 100);
    }

    #[test]
    fn zero_step_override_rejected() {
        let args = SeriesArgs {
            step: Some(0),
            ..Default::default()
        };
        assert!(args.apply(ExpectedSeries::default()).is_err());
    }

    #[test]
    fn overflowing_override_rejected() {
        let args = SeriesArgs {
            first: Some(usize::MAX - 10),
            last: Some(usize::MAX - 10),
            step: None,
        };
        assert!(args.apply(ExpectedSeries::default()).is_err());
    }

    #[test]
    fn output_parent_created() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("reports/nested/article_ids.csv");
        prepare_output(&out).unwrap();
        assert!(dir.path().join("reports/nested").is_dir());
        assert!(prepare_output(Path::new("bare.csv")).is_ok());
    }
}
