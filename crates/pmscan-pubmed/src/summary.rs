//! Summary pass: parse every matched export and list its articles

use std::fmt;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use pmscan_core::{ProgressContext, discover, read_xml, write_atomic};

use crate::config::{Config, SampleLimits};
use crate::parser::{PubmedArticle, parse_pubmed_xml};

const NA: &str = "N/A";

/// Parsed contents of one export file
#[derive(Debug, Clone)]
pub struct FileDigest {
    pub name: String,
    pub articles: Vec<PubmedArticle>,
}

/// Parse every file matching the configured pattern.
///
/// Files that fail to read or parse are logged and left out.
pub fn run_summary(config: &Config, progress: &ProgressContext) -> Result<Vec<FileDigest>> {
    let start = Instant::now();

    if !config.input_dir.is_dir() {
        bail!("Input directory not found: {}", config.input_dir.display());
    }

    let files = discover(&config.input_dir, &config.pattern)
        .with_context(|| format!("Invalid file pattern: {}", config.pattern))?;
    log::info!("Found {} XML files to process", files.len());

    let pb = progress.files_bar("summary", files.len());
    let mut digests = Vec::with_capacity(files.len());

    for file in files {
        pb.set_message(file.name.clone());
        log::info!("Processing: {}", file.name);
        match read_xml(&file.path).and_then(|xml| parse_pubmed_xml(&xml)) {
            Ok(articles) => {
                log::info!("  - Found {} articles", articles.len());
                digests.push(FileDigest {
                    name: file.name,
                    articles,
                });
            }
            Err(e) => log::error!("  - Failed to parse {}: {e}", file.name),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    log::info!(
        "Parsed {} files, {} articles in {:.1}s",
        digests.len(),
        total_articles(&digests),
        start.elapsed().as_secs_f64()
    );

    Ok(digests)
}

pub fn total_articles(digests: &[FileDigest]) -> usize {
    digests.iter().map(|d| d.articles.len()).sum()
}

/// Full plain-text report (`pubmed_summary.txt`)
pub fn render_report(digests: &[FileDigest]) -> String {
    SummaryReport(digests).to_string()
}

/// Write the full report to `path`; returns bytes written.
///
/// Nothing is written, and no file is created, when no file was parsed.
pub fn write_report(digests: &[FileDigest], path: &Path) -> Result<u64> {
    if digests.is_empty() {
        log::warn!("No XML files were successfully processed.");
        return Ok(0);
    }
    write_atomic(path, &render_report(digests))
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Console preview: first few articles per file, long fields shortened
pub fn render_samples(digests: &[FileDigest], limits: SampleLimits) -> String {
    SamplePreview { digests, limits }.to_string()
}

struct SummaryReport<'a>(&'a [FileDigest]);

impl fmt::Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digests = self.0;

        writeln!(f, "PubMed XML Processing Summary")?;
        writeln!(f, "{}", "=".repeat(40))?;
        writeln!(f)?;
        writeln!(f, "Total XML files processed: {}", digests.len())?;
        writeln!(f, "Total articles found: {}", total_articles(digests))?;
        writeln!(f)?;

        for digest in digests {
            writeln!(f, "File: {}", digest.name)?;
            writeln!(f, "Articles: {}", digest.articles.len())?;
            writeln!(f, "{}", "-".repeat(30))?;

            for (i, article) in digest.articles.iter().enumerate() {
                writeln!(f)?;
                writeln!(f, "Article {}:", i + 1)?;
                write_fields(f, article)?;

                let authors = author_names(article);
                if !authors.is_empty() {
                    writeln!(f, "  Authors: {}", authors.join(", "))?;
                }
                if let Some(abstract_text) = &article.abstract_text {
                    writeln!(f, "  Abstract: {abstract_text}")?;
                }
            }

            writeln!(f)?;
            writeln!(f, "{}", "=".repeat(50))?;
            writeln!(f)?;
        }

        Ok(())
    }
}

struct SamplePreview<'a> {
    digests: &'a [FileDigest],
    limits: SampleLimits,
}

impl fmt::Display for SamplePreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let limits = self.limits;

        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(
            f,
            "SAMPLE ARTICLES (showing up to {} per file)",
            limits.max_articles
        )?;
        writeln!(f, "{}", "=".repeat(60))?;

        for digest in self.digests {
            writeln!(f)?;
            writeln!(f, "File: {}", digest.name)?;
            writeln!(f, "{}", "-".repeat(40))?;

            for (i, article) in digest.articles.iter().take(limits.max_articles).enumerate() {
                writeln!(f)?;
                writeln!(f, "Article {}:", i + 1)?;
                write_fields(f, article)?;

                let authors = author_names(article);
                if !authors.is_empty() {
                    let shown = &authors[..authors.len().min(limits.max_authors)];
                    let more = if authors.len() > limits.max_authors {
                        "..."
                    } else {
                        ""
                    };
                    writeln!(f, "  Authors: {}{more}", shown.join(", "))?;
                }
                if let Some(abstract_text) = &article.abstract_text {
                    writeln!(
                        f,
                        "  Abstract: {}",
                        truncate_chars(abstract_text, limits.abstract_chars)
                    )?;
                }
            }
        }

        Ok(())
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, article: &PubmedArticle) -> fmt::Result {
    let date = article.pub_date.display();
    writeln!(f, "  PMID: {}", or_na(article.pmid.as_deref()))?;
    writeln!(f, "  Title: {}", or_na(article.title.as_deref()))?;
    writeln!(f, "  Journal: {}", or_na(article.journal_title.as_deref()))?;
    writeln!(f, "  Date: {}", or_na(date.as_deref()))?;
    writeln!(f, "  DOI: {}", or_na(article.doi.as_deref()))
}

fn author_names(article: &PubmedArticle) -> Vec<String> {
    article.authors.iter().filter_map(|a| a.display()).collect()
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NA)
}

/// First `max` characters, with `...` appended when something was cut
fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Author, PubDate};

    fn author(last: &str, fore: &str) -> Author {
        Author {
            last_name: Some(last.to_string()),
            fore_name: Some(fore.to_string()),
            ..Default::default()
        }
    }

    fn article() -> PubmedArticle {
        PubmedArticle {
            pmid: Some("31000001".to_string()),
            title: Some("Amyloid clearance in mice.".to_string()),
            journal_title: Some("Neuron".to_string()),
            pub_date: PubDate {
                year: Some("2019".to_string()),
                month: Some("Apr".to_string()),
                ..Default::default()
            },
            abstract_text: Some("Short abstract.".to_string()),
            authors: vec![
                author("Smith", "Anna"),
                author("Lee", "Ben"),
                author("Ng", "Cara"),
                author("Ortiz", "Dan"),
            ],
            doi: None,
            article_ids: None,
        }
    }

    #[test]
    fn report_layout() {
        let digests = vec![FileDigest {
            name: "pubmed_0_to_99.xml".to_string(),
            articles: vec![article()],
        }];
        let report = render_report(&digests);
        let expected = "\
PubMed XML Processing Summary
========================================

Total XML files processed: 1
Total articles found: 1

File: pubmed_0_to_99.xml
Articles: 1
------------------------------

Article 1:
  PMID: 31000001
  Title: Amyloid clearance in mice.
  Journal: Neuron
  Date: 2019-Apr
  DOI: N/A
  Authors: Smith, Anna, Lee, Ben, Ng, Cara, Ortiz, Dan
  Abstract: Short abstract.

==================================================

";
        assert_eq!(report, expected);
    }

    #[test]
    fn report_skips_empty_authors_and_abstract() {
        let digests = vec![FileDigest {
            name: "f.xml".to_string(),
            articles: vec![PubmedArticle::default()],
        }];
        let report = render_report(&digests);
        assert!(report.contains("  PMID: N/A\n  Title: N/A\n"));
        assert!(!report.contains("Authors:"));
        assert!(!report.contains("Abstract:"));
    }

    #[test]
    fn samples_truncate_authors_and_articles() {
        let digests = vec![FileDigest {
            name: "f.xml".to_string(),
            articles: vec![article(); 7],
        }];
        let limits = SampleLimits::default();
        let samples = render_samples(&digests, limits);

        assert!(samples.contains("SAMPLE ARTICLES (showing up to 5 per file)"));
        assert!(samples.contains("  Authors: Smith, Anna, Lee, Ben, Ng, Cara...\n"));
        assert!(samples.contains("Article 5:"));
        assert!(!samples.contains("Article 6:"));
    }

    #[test]
    fn samples_truncate_abstract() {
        let mut long = article();
        long.abstract_text = Some("x".repeat(250));
        let digests = vec![FileDigest {
            name: "f.xml".to_string(),
            articles: vec![long],
        }];
        let samples = render_samples(&digests, SampleLimits::default());
        let expected = format!("  Abstract: {}...\n", "x".repeat(200));
        assert!(samples.contains(&expected));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("αβγδ", 2), "αβ...");
        assert_eq!(truncate_chars("αβ", 2), "αβ");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn totals() {
        let digests = vec![
            FileDigest {
                name: "a".to_string(),
                articles: vec![article(); 2],
            },
            FileDigest {
                name: "b".to_string(),
                articles: vec![],
            },
        ];
        assert_eq!(total_articles(&digests), 2);
    }
}
