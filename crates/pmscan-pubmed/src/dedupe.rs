//! Sort a headed CSV by its first column and drop repeated keys

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use pmscan_core::AtomicFile;
use rustc_hash::FxHashSet;

/// Row counts of a dedupe run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupeSummary {
    pub original: usize,
    pub kept: usize,
    pub removed: usize,
    /// File the result was written to
    pub output: PathBuf,
}

/// Ordering and identity of first-column values: integers numerically, then
/// text, then blanks. `5`, `05` and ` 5` are one key, as are `""` and `N/A`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum SortKey<'a> {
    Number(i64),
    Text(&'a str),
    Missing,
}

impl<'a> SortKey<'a> {
    fn of(value: &'a str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == "N/A" {
            return Self::Missing;
        }
        match trimmed.parse::<i64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(value),
        }
    }
}

fn key_of(row: &csv::StringRecord) -> SortKey<'_> {
    SortKey::of(row.get(0).unwrap_or(""))
}

fn compare_rows(a: &csv::StringRecord, b: &csv::StringRecord) -> Ordering {
    key_of(a).cmp(&key_of(b))
}

/// Sort `input` by its first column and keep the first row per key.
///
/// Writes to `output`, or replaces `input` when `output` is `None`.
/// Rows with equal keys keep their input order.
pub fn dedupe_csv(input: &Path, output: Option<&Path>) -> Result<DedupeSummary> {
    if !input.is_file() {
        bail!("File not found: {}", input.display());
    }

    let mut reader = csv::Reader::from_path(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", input.display()))?
        .clone();
    if headers.is_empty() {
        bail!("No columns in {}", input.display());
    }

    let mut rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read rows of {}", input.display()))?;
    let original = rows.len();
    log::debug!(
        "Sorting {original} rows of {} by '{}'",
        input.display(),
        &headers[0]
    );

    rows.sort_by(compare_rows);

    let keep: Vec<bool> = {
        let mut seen = FxHashSet::default();
        rows.iter().map(|row| seen.insert(key_of(row))).collect()
    };
    let rows: Vec<csv::StringRecord> = rows
        .into_iter()
        .zip(keep)
        .filter_map(|(row, first)| first.then_some(row))
        .collect();

    let out_path = output.unwrap_or(input).to_path_buf();
    let file = AtomicFile::create(&out_path)
        .with_context(|| format!("Failed to create {}", out_path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(&headers)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    let file = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("Failed to flush CSV")?;
    file.finish()
        .with_context(|| format!("Failed to finalize {}", out_path.display()))?;

    let kept = rows.len();
    log::info!(
        "Deduplicated {}: {original} rows, {kept} kept, {} removed",
        input.display(),
        original - kept
    );

    Ok(DedupeSummary {
        original,
        kept,
        removed: original - kept,
        output: out_path,
    })
}
