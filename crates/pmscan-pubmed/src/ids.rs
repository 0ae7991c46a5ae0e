//! ArticleIdList extraction into flat CSV rows
//!
//! One row per article that carries an `ArticleIdList`. The six common id
//! types get fixed columns; any other type seen in the run gets an
//! `other_<type>` column, sorted by name.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use pmscan_core::{AtomicFile, ProgressContext, read_xml};

use crate::config::Config;
use crate::parser::{PubmedArticle, parse_pubmed_xml};

/// Id types with a dedicated column, in column order
pub const KNOWN_ID_TYPES: [&str; 6] = ["pubmed", "mid", "pmc", "doi", "pii", "pmcid"];

/// Leading columns before the known id types
const LEAD_COLUMNS: [&str; 2] = ["pmid", "file_source"];

const SAMPLE_ENTRIES: usize = 5;

/// Identifiers of one article
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleIdRecord {
    /// Citation PMID, `"N/A"` if the record has none
    pub pmid: String,
    /// Name of the export file the record came from
    pub file_source: String,
    /// Values for [`KNOWN_ID_TYPES`], same order
    pub known: [Option<String>; 6],
    /// Every other id type; a present key with a `None` value is an empty id
    pub other: BTreeMap<String, Option<String>>,
}

impl ArticleIdRecord {
    /// Build a record from a parsed article; `None` without an `ArticleIdList`.
    ///
    /// When a type repeats, the last value wins.
    pub fn from_article(article: &PubmedArticle, file_source: &str) -> Option<Self> {
        let ids = article.article_ids.as_ref()?;
        let mut record = Self {
            pmid: article.pmid.clone().unwrap_or_else(|| "N/A".to_string()),
            file_source: file_source.to_string(),
            ..Default::default()
        };

        for id in ids {
            match known_index(&id.id_type) {
                Some(idx) => record.known[idx] = id.value.clone(),
                None => {
                    record.other.insert(id.id_type.clone(), id.value.clone());
                }
            }
        }

        Some(record)
    }

    /// Value of a known id type, if present and non-empty
    pub fn known(&self, id_type: &str) -> Option<&str> {
        known_index(id_type)
            .and_then(|idx| self.known[idx].as_deref())
            .filter(|v| !v.is_empty())
    }
}

fn known_index(id_type: &str) -> Option<usize> {
    KNOWN_ID_TYPES.iter().position(|t| *t == id_type)
}

/// Records from one file's articles, in document order
pub fn extract_records(articles: &[PubmedArticle], file_source: &str) -> Vec<ArticleIdRecord> {
    articles
        .iter()
        .filter_map(|a| ArticleIdRecord::from_article(a, file_source))
        .collect()
}

/// Result of an ids pass
#[derive(Debug, Default)]
pub struct IdExtraction {
    pub records: Vec<ArticleIdRecord>,
    /// Files present on disk (failed ones included)
    pub files_processed: usize,
    pub files_missing: usize,
    pub files_failed: usize,
}

/// Extract ArticleIdList rows from every file of the expected series
pub fn run_ids(config: &Config, progress: &ProgressContext) -> Result<IdExtraction> {
    let start = Instant::now();

    if !config.input_dir.is_dir() {
        bail!("Input directory not found: {}", config.input_dir.display());
    }

    let slots = config.series.resolve(&config.input_dir);
    log::info!("Generated {} file names to check", slots.len());

    let pb = progress.files_bar("ids", slots.len());
    let mut extraction = IdExtraction::default();

    for (name, path) in slots {
        pb.set_message(name.clone());
        pb.inc(1);

        let Some(path) = path else {
            log::warn!("File not found: {name}");
            extraction.files_missing += 1;
            continue;
        };

        log::info!("Processing: {name}");
        extraction.files_processed += 1;
        match read_xml(&path).and_then(|xml| parse_pubmed_xml(&xml)) {
            Ok(articles) => {
                let records = extract_records(&articles, &name);
                log::info!("  - Found {} ArticleIdList entries", records.len());
                extraction.records.extend(records);
            }
            Err(e) => {
                log::error!("Error parsing XML file {name}: {e}");
                extraction.files_failed += 1;
            }
        }
    }
    pb.finish_and_clear();

    log::info!("Total files processed: {}", extraction.files_processed);
    log::info!(
        "Total ArticleIdList entries found: {} ({:.1}s)",
        extraction.records.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(extraction)
}

/// CSV header: lead columns, known types, then sorted `other_<type>`
pub fn columns(records: &[ArticleIdRecord]) -> Vec<String> {
    let mut cols: Vec<String> = LEAD_COLUMNS
        .iter()
        .chain(KNOWN_ID_TYPES.iter())
        .map(|c| c.to_string())
        .collect();
    cols.extend(other_types(records).into_iter().map(|t| format!("other_{t}")));
    cols
}

fn other_types(records: &[ArticleIdRecord]) -> Vec<&str> {
    let mut types: Vec<&str> = records
        .iter()
        .flat_map(|r| r.other.keys().map(String::as_str))
        .collect();
    types.sort_unstable();
    types.dedup();
    types
}

/// Dimensions of a written CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvShape {
    pub rows: usize,
    pub columns: usize,
}

/// Write header and one row per record; absent values are empty cells.
///
/// Nothing is written, and no file is created, when `records` is empty.
pub fn write_csv(records: &[ArticleIdRecord], path: &Path) -> Result<CsvShape> {
    let header = columns(records);
    if records.is_empty() {
        log::warn!("No records to save to {}", path.display());
        return Ok(CsvShape {
            rows: 0,
            columns: header.len(),
        });
    }
    let others = other_types(records);

    let file = AtomicFile::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    writer
        .write_record(&header)
        .context("Failed to write CSV header")?;

    for record in records {
        let mut row: Vec<&str> = Vec::with_capacity(header.len());
        row.push(&record.pmid);
        row.push(&record.file_source);
        row.extend(record.known.iter().map(|v| v.as_deref().unwrap_or("")));
        row.extend(
            others
                .iter()
                .map(|t| record.other.get(*t).and_then(|v| v.as_deref()).unwrap_or("")),
        );
        writer
            .write_record(&row)
            .with_context(|| format!("Failed to write CSV row for PMID {}", record.pmid))?;
    }

    let file = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("Failed to flush CSV")?;
    file.finish()
        .with_context(|| format!("Failed to finalize {}", path.display()))?;

    Ok(CsvShape {
        rows: records.len(),
        columns: header.len(),
    })
}

/// How often each id type occurs across records
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IdStats {
    pub total: usize,
    /// Records with a non-empty value, per [`KNOWN_ID_TYPES`]
    pub known: [usize; 6],
    /// Records carrying at least one other id type
    pub with_other: usize,
    /// Records carrying each other id type
    pub other_types: BTreeMap<String, usize>,
}

impl IdStats {
    pub fn collect(records: &[ArticleIdRecord]) -> Self {
        let mut stats = Self {
            total: records.len(),
            ..Default::default()
        };

        for record in records {
            for (idx, value) in record.known.iter().enumerate() {
                if value.as_deref().is_some_and(|v| !v.is_empty()) {
                    stats.known[idx] += 1;
                }
            }
            if !record.other.is_empty() {
                stats.with_other += 1;
                for id_type in record.other.keys() {
                    *stats.other_types.entry(id_type.clone()).or_default() += 1;
                }
            }
        }

        stats
    }
}

/// Console summary: type distribution and the first few records
pub fn render_summary(records: &[ArticleIdRecord], stats: &IdStats) -> String {
    IdSummary { records, stats }.to_string()
}

struct IdSummary<'a> {
    records: &'a [ArticleIdRecord],
    stats: &'a IdStats,
}

impl fmt::Display for IdSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats;

        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f, "ARTICLE ID LIST SUMMARY")?;
        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f)?;
        writeln!(f, "Total ArticleIdList entries: {}", stats.total)?;
        writeln!(f)?;
        writeln!(f, "ID Type Distribution:")?;
        for (id_type, count) in KNOWN_ID_TYPES.iter().zip(stats.known) {
            if count > 0 {
                writeln!(f, "  {}: {count}", id_type.to_uppercase())?;
            }
        }
        if stats.with_other > 0 {
            writeln!(f, "  OTHER: {}", stats.with_other)?;
        }

        if !stats.other_types.is_empty() {
            writeln!(f)?;
            writeln!(f, "Other ID types found:")?;
            for (id_type, count) in &stats.other_types {
                writeln!(f, "  {id_type}: {count}")?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Sample entries (first {SAMPLE_ENTRIES}):")?;
        for (i, record) in self.records.iter().take(SAMPLE_ENTRIES).enumerate() {
            writeln!(f)?;
            writeln!(f, "Entry {}:", i + 1)?;
            writeln!(f, "  PMID: {}", record.pmid)?;
            writeln!(f, "  File: {}", record.file_source)?;
            for id_type in KNOWN_ID_TYPES {
                if let Some(value) = record.known(id_type) {
                    writeln!(f, "  {}: {value}", id_type.to_uppercase())?;
                }
            }
            if !record.other.is_empty() {
                let json = serde_json::to_string(&record.other).map_err(|_| fmt::Error)?;
                writeln!(f, "  Other IDs: {json}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ArticleId;

    fn id(id_type: &str, value: &str) -> ArticleId {
        ArticleId {
            id_type: id_type.to_string(),
            value: Some(value.to_string()),
        }
    }

    fn article(pmid: Option<&str>, ids: Option<Vec<ArticleId>>) -> PubmedArticle {
        PubmedArticle {
            pmid: pmid.map(str::to_string),
            article_ids: ids,
            ..Default::default()
        }
    }

    #[test]
    fn record_from_article() {
        let a = article(
            Some("100"),
            Some(vec![
                id("pubmed", "100"),
                id("doi", "10.1/x"),
                id("pmc", "PMC9"),
                id("medline", "M1"),
            ]),
        );
        let record = ArticleIdRecord::from_article(&a, "pubmed_0_to_99.xml").unwrap();

        assert_eq!(record.pmid, "100");
        assert_eq!(record.file_source, "pubmed_0_to_99.xml");
        assert_eq!(record.known("pubmed"), Some("100"));
        assert_eq!(record.known("doi"), Some("10.1/x"));
        assert_eq!(record.known("pmc"), Some("PMC9"));
        assert_eq!(record.known("pii"), None);
        assert_eq!(
            record.other.get("medline"),
            Some(&Some("M1".to_string()))
        );
    }

    #[test]
    fn no_id_list_no_record() {
        assert!(ArticleIdRecord::from_article(&article(Some("1"), None), "f").is_none());
        let empty = ArticleIdRecord::from_article(&article(None, Some(vec![])), "f").unwrap();
        assert_eq!(empty.pmid, "N/A");
        assert!(empty.other.is_empty());
    }

    #[test]
    fn repeated_type_last_wins() {
        let a = article(Some("1"), Some(vec![id("doi", "first"), id("doi", "second")]));
        let record = ArticleIdRecord::from_article(&a, "f").unwrap();
        assert_eq!(record.known("doi"), Some("second"));
    }

    #[test]
    fn extract_keeps_order_and_skips_listless() {
        let articles = vec![
            article(Some("1"), Some(vec![id("pubmed", "1")])),
            article(Some("2"), None),
            article(Some("3"), Some(vec![id("pubmed", "3")])),
        ];
        let records = extract_records(&articles, "f");
        let pmids: Vec<&str> = records.iter().map(|r| r.pmid.as_str()).collect();
        assert_eq!(pmids, vec!["1", "3"]);
    }

    #[test]
    fn columns_sorted_others() {
        let articles = vec![
            article(Some("1"), Some(vec![id("sici", "s"), id("bookaccession", "b")])),
            article(Some("2"), Some(vec![id("sici", "t"), id("mid", "NIHMS1")])),
        ];
        let records = extract_records(&articles, "f");
        assert_eq!(
            columns(&records),
            vec![
                "pmid",
                "file_source",
                "pubmed",
                "mid",
                "pmc",
                "doi",
                "pii",
                "pmcid",
                "other_bookaccession",
                "other_sici"
            ]
        );
    }

    #[test]
    fn write_csv_without_records_creates_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("article_ids.csv");

        let shape = write_csv(&[], &path).unwrap();
        assert_eq!(shape.rows, 0);
        assert_eq!(shape.columns, 8);
        assert!(!path.exists());
        assert!(!dir.path().join("article_ids.csv.tmp").exists());
    }

    #[test]
    fn stats_count_presence() {
        let articles = vec![
            article(Some("1"), Some(vec![id("pubmed", "1"), id("doi", "d1")])),
            article(
                Some("2"),
                Some(vec![
                    id("pubmed", "2"),
                    ArticleId {
                        id_type: "doi".to_string(),
                        value: None,
                    },
                    id("sici", "x"),
                ]),
            ),
        ];
        let stats = IdStats::collect(&extract_records(&articles, "f"));

        assert_eq!(stats.total, 2);
        assert_eq!(stats.known[0], 2); // pubmed
        assert_eq!(stats.known[3], 1); // doi, empty value not counted
        assert_eq!(stats.with_other, 1);
        assert_eq!(stats.other_types.get("sici"), Some(&1));
    }

    #[test]
    fn summary_text() {
        let articles = vec![article(
            Some("7"),
            Some(vec![id("pubmed", "7"), id("sici", "abc")]),
        )];
        let records = extract_records(&articles, "pubmed_0_to_99.xml");
        let text = render_summary(&records, &IdStats::collect(&records));

        assert!(text.contains("Total ArticleIdList entries: 1\n"));
        assert!(text.contains("ID Type Distribution:\n  PUBMED: 1\n  OTHER: 1\n"));
        assert!(!text.contains("  DOI:"));
        assert!(text.contains("Other ID types found:\n  sici: 1\n"));
        assert!(text.contains("Entry 1:\n  PMID: 7\n  File: pubmed_0_to_99.xml\n  PUBMED: 7\n"));
        assert!(text.contains(r#"  Other IDs: {"sici":"abc"}"#));
    }
}
