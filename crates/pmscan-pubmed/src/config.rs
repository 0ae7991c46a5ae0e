//! Scan configuration

use std::path::{Path, PathBuf};

use pmscan_core::ExpectedSeries;

/// Runtime configuration shared by all scan passes
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the exported XML files
    pub input_dir: PathBuf,
    /// Glob pattern used by the summary pass
    pub pattern: String,
    /// Numbered series checked by the inventory and ids passes
    pub series: ExpectedSeries,
    /// Directory reports are written to
    pub output_dir: PathBuf,
    pub inventory_report: String,
    pub summary_report: String,
    pub ids_csv: String,
    /// Console preview limits for the summary pass
    pub samples: SampleLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            pattern: "pubmed_*_to_*.xml".to_string(),
            series: ExpectedSeries::default(),
            output_dir: PathBuf::from("."),
            inventory_report: "xml_file_summary.txt".to_string(),
            summary_report: "pubmed_summary.txt".to_string(),
            ids_csv: "article_ids.csv".to_string(),
            samples: SampleLimits::default(),
        }
    }
}

impl Config {
    pub fn inventory_report_path(&self) -> PathBuf {
        resolve_output(&self.output_dir, &self.inventory_report)
    }

    pub fn summary_report_path(&self) -> PathBuf {
        resolve_output(&self.output_dir, &self.summary_report)
    }

    pub fn ids_csv_path(&self) -> PathBuf {
        resolve_output(&self.output_dir, &self.ids_csv)
    }
}

/// Absolute names are kept as given, relative ones land in `output_dir`
fn resolve_output(output_dir: &Path, name: &str) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        output_dir.join(path)
    }
}

/// How much of each file the console preview shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleLimits {
    /// Articles shown per file
    pub max_articles: usize,
    /// Authors shown before `...`
    pub max_authors: usize,
    /// Abstract characters shown before `...`
    pub abstract_chars: usize,
}

impl Default for SampleLimits {
    fn default() -> Self {
        Self {
            max_articles: 5,
            max_authors: 3,
            abstract_chars: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.input_dir, PathBuf::from("."));
        assert_eq!(config.pattern, "pubmed_*_to_*.xml");
        assert_eq!(config.series.file_names().len(), 37);
        assert_eq!(config.samples.max_articles, 5);
        assert_eq!(config.samples.abstract_chars, 200);
    }

    #[test]
    fn output_paths_join_output_dir() {
        let config = Config {
            output_dir: PathBuf::from("/tmp/reports"),
            ..Default::default()
        };
        assert_eq!(
            config.ids_csv_path(),
            PathBuf::from("/tmp/reports/article_ids.csv")
        );
        assert_eq!(
            config.inventory_report_path(),
            PathBuf::from("/tmp/reports/xml_file_summary.txt")
        );
    }

    #[test]
    fn absolute_output_name_kept() {
        let config = Config {
            output_dir: PathBuf::from("/tmp/reports"),
            summary_report: "/var/tmp/summary.txt".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.summary_report_path(),
            PathBuf::from("/var/tmp/summary.txt")
        );
    }
}
