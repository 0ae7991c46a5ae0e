//! Inventory pass: which expected export files exist and how many records each holds

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use pmscan_core::{ProgressContext, read_xml};

use crate::config::Config;
use crate::parser::count_articles;

/// Outcome for one expected file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Found { articles: usize },
    /// Present but unreadable or malformed
    Failed { error: String },
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub status: FileStatus,
}

impl FileEntry {
    pub fn exists(&self) -> bool {
        !matches!(self.status, FileStatus::Missing)
    }

    pub fn articles(&self) -> usize {
        match self.status {
            FileStatus::Found { articles } => articles,
            _ => 0,
        }
    }
}

/// Result of an inventory pass, in series order
#[derive(Debug, Default)]
pub struct Inventory {
    pub entries: Vec<FileEntry>,
    pub elapsed: Duration,
}

impl Inventory {
    /// Files present on disk, including ones that failed to parse
    pub fn found(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter().filter(|e| e.exists())
    }

    pub fn missing(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter().filter(|e| !e.exists())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, FileStatus::Failed { .. }))
    }

    pub fn total_articles(&self) -> usize {
        self.entries.iter().map(FileEntry::articles).sum()
    }
}

/// Check every file of the expected series and count its articles
pub fn run_inventory(config: &Config, progress: &ProgressContext) -> Result<Inventory> {
    let start = Instant::now();

    if !config.input_dir.is_dir() {
        bail!("Input directory not found: {}", config.input_dir.display());
    }

    let slots = config.series.resolve(&config.input_dir);
    log::info!("Generated {} file names to check", slots.len());

    let pb = progress.files_bar("inventory", slots.len());
    let mut entries = Vec::with_capacity(slots.len());

    for (name, path) in slots {
        pb.set_message(name.clone());
        let status = match path {
            Some(path) => inspect_file(&name, &path),
            None => {
                log::warn!("File not found: {name}");
                FileStatus::Missing
            }
        };
        entries.push(FileEntry { name, status });
        pb.inc(1);
    }
    pb.finish_and_clear();

    let inventory = Inventory {
        entries,
        elapsed: start.elapsed(),
    };

    log::info!(
        "Inventory: {} found, {} missing, {} failed, {} articles in {:.1}s",
        inventory.found().count(),
        inventory.missing().count(),
        inventory.failed().count(),
        inventory.total_articles(),
        inventory.elapsed.as_secs_f64()
    );

    Ok(inventory)
}

fn inspect_file(name: &str, path: &Path) -> FileStatus {
    match read_xml(path).and_then(|xml| count_articles(&xml)) {
        Ok(articles) => {
            log::info!("{name}: {articles} articles");
            FileStatus::Found { articles }
        }
        Err(e) if e.is_missing() => {
            // removed between resolve and read
            log::warn!("File not found: {name}");
            FileStatus::Missing
        }
        Err(e) => {
            log::error!("Error reading {name}: {e}");
            FileStatus::Failed {
                error: e.to_string(),
            }
        }
    }
}

/// Plain-text inventory report (`xml_file_summary.txt`)
pub fn render_report(inventory: &Inventory) -> String {
    InventoryReport(inventory).to_string()
}

struct InventoryReport<'a>(&'a Inventory);

impl fmt::Display for InventoryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inventory = self.0;

        writeln!(f, "PubMed XML File Summary")?;
        writeln!(f, "{}", "=".repeat(30))?;
        writeln!(f)?;
        writeln!(f, "Files found: {}", inventory.found().count())?;
        writeln!(f, "Files missing: {}", inventory.missing().count())?;
        writeln!(f, "Total articles: {}", inventory.total_articles())?;
        writeln!(f)?;

        writeln!(f, "Existing files:")?;
        writeln!(f, "{}", "-".repeat(20))?;
        for entry in inventory.found() {
            match &entry.status {
                FileStatus::Failed { error } => {
                    writeln!(f, "{}: 0 articles (ERROR: {error})", entry.name)?
                }
                _ => writeln!(f, "{}: {} articles", entry.name, entry.articles())?,
            }
        }

        if inventory.missing().next().is_some() {
            writeln!(f)?;
            writeln!(f, "Missing files:")?;
            writeln!(f, "{}", "-".repeat(15))?;
            for entry in inventory.missing() {
                writeln!(f, "{}", entry.name)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, status: FileStatus) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            status,
        }
    }

    fn sample() -> Inventory {
        Inventory {
            entries: vec![
                entry("pubmed_0_to_99.xml", FileStatus::Found { articles: 100 }),
                entry(
                    "pubmed_100_to_199.xml",
                    FileStatus::Failed {
                        error: "no element found".to_string(),
                    },
                ),
                entry("pubmed_200_to_299.xml", FileStatus::Missing),
                entry("pubmed_300_to_399.xml", FileStatus::Found { articles: 98 }),
            ],
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn counts() {
        let inv = sample();
        assert_eq!(inv.found().count(), 3);
        assert_eq!(inv.missing().count(), 1);
        assert_eq!(inv.failed().count(), 1);
        assert_eq!(inv.total_articles(), 198);
    }

    #[test]
    fn report_layout() {
        let report = render_report(&sample());
        let expected = "\
PubMed XML File Summary
==============================

Files found: 3
Files missing: 1
Total articles: 198

Existing files:
--------------------
pubmed_0_to_99.xml: 100 articles
pubmed_100_to_199.xml: 0 articles (ERROR: no element found)
pubmed_300_to_399.xml: 98 articles

Missing files:
---------------
pubmed_200_to_299.xml
";
        assert_eq!(report, expected);
    }

    #[test]
    fn report_omits_missing_section_when_complete() {
        let inv = Inventory {
            entries: vec![entry("pubmed_0_to_99.xml", FileStatus::Found { articles: 1 })],
            elapsed: Duration::ZERO,
        };
        let report = render_report(&inv);
        assert!(!report.contains("Missing files:"));
        assert!(report.ends_with("pubmed_0_to_99.xml: 1 articles\n"));
    }
}
