//! pmscan - batch reports over locally exported PubMed XML files
//!
//! Checks which numbered exports are present, summarizes their articles,
//! and flattens ArticleIdList identifiers into CSV.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "pmscan")]
#[command(about = "Batch reports over exported PubMed XML files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./pmscan.toml or ~/.config/pmscan/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the pubmed_*_to_*.xml exports
    #[arg(short, long, global = true)]
    input_dir: Option<PathBuf>,

    /// Directory reports are written to
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Check which files of the numbered series exist and count their articles
    Inventory(cmd::inventory::InventoryArgs),
    /// Extract titles, authors and abstracts from every matching file
    Summary(cmd::summary::SummaryArgs),
    /// Export ArticleIdList identifiers to CSV
    Ids(cmd::ids::IdsArgs),
    /// Sort a CSV by its first column and drop duplicate keys
    Dedupe(cmd::dedupe::DedupeArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = Arc::new(pmscan_core::ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug, progress bars show activity
    //   non-TTY: info unless --debug, logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    pmscan_core::init_logging(quiet, cli.debug, multi)?;

    // Load configuration
    let config = if let Some(path) = &cli.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    // Config file defaults, CLI overrides
    let mut scan = config.scan_config();
    if let Some(dir) = cli.input_dir {
        scan.input_dir = dir;
    }
    if let Some(dir) = cli.output_dir {
        scan.output_dir = dir;
    }

    match cli.command {
        Command::Inventory(args) => cmd::inventory::run(args, scan, &progress),
        Command::Summary(args) => cmd::summary::run(args, scan, &progress),
        Command::Ids(args) => cmd::ids::run(args, scan, &progress),
        Command::Dedupe(args) => cmd::dedupe::run(args),
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec!["Input directory", &scan.input_dir.display().to_string()]);
            table.add_row(vec!["File pattern", &scan.pattern]);
            table.add_row(vec![
                "Series",
                &format!(
                    "{}..={} step {} ({} files)",
                    scan.series.first,
                    scan.series.last,
                    scan.series.step,
                    scan.series.file_names().len()
                ),
            ]);
            table.add_row(vec![
                "Output directory",
                &scan.output_dir.display().to_string(),
            ]);
            table.add_row(vec![
                "Inventory report",
                &scan.inventory_report_path().display().to_string(),
            ]);
            table.add_row(vec![
                "Summary report",
                &scan.summary_report_path().display().to_string(),
            ]);
            table.add_row(vec!["IDs CSV", &scan.ids_csv_path().display().to_string()]);
            table.add_row(vec![
                "Sample articles",
                &scan.samples.max_articles.to_string(),
            ]);
            table.add_row(vec![
                "Abstract chars",
                &scan.samples.abstract_chars.to_string(),
            ]);

            eprintln!("\n{table}");
            Ok(())
        }
    }
}
