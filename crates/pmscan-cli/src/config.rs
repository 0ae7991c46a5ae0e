//! Configuration loading from TOML files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use pmscan_core::ExpectedSeries;
use serde::Deserialize;

/// Global configuration for pmscan
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub series: SeriesConfig,
    pub output: OutputConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub dir: PathBuf,
    pub pattern: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        let scan = pmscan_pubmed::Config::default();
        Self {
            dir: scan.input_dir,
            pattern: scan.pattern,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    pub first: usize,
    pub last: usize,
    pub step: usize,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        let series = ExpectedSeries::default();
        Self {
            first: series.first,
            last: series.last,
            step: series.step,
        }
    }
}

impl From<SeriesConfig> for ExpectedSeries {
    fn from(s: SeriesConfig) -> Self {
        Self {
            first: s.first,
            last: s.last,
            step: s.step,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub inventory_report: String,
    pub summary_report: String,
    pub ids_csv: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let scan = pmscan_pubmed::Config::default();
        Self {
            dir: scan.output_dir,
            inventory_report: scan.inventory_report,
            summary_report: scan.summary_report,
            ids_csv: scan.ids_csv,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub sample_articles: usize,
    pub abstract_chars: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let limits = pmscan_pubmed::SampleLimits::default();
        Self {
            sample_articles: limits.max_articles,
            abstract_chars: limits.abstract_chars,
        }
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./pmscan.toml (current directory)
    /// 2. ~/.config/pmscan/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("pmscan.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "pmscan") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse TOML")?;
        validate_series(config.series.into())?;
        Ok(config)
    }

    /// Settings for the scan passes
    pub fn scan_config(&self) -> pmscan_pubmed::Config {
        let defaults = pmscan_pubmed::SampleLimits::default();
        pmscan_pubmed::Config {
            input_dir: self.input.dir.clone(),
            pattern: self.input.pattern.clone(),
            series: self.series.into(),
            output_dir: self.output.dir.clone(),
            inventory_report: self.output.inventory_report.clone(),
            summary_report: self.output.summary_report.clone(),
            ids_csv: self.output.ids_csv.clone(),
            samples: pmscan_pubmed::SampleLimits {
                max_articles: self.report.sample_articles,
                abstract_chars: self.report.abstract_chars,
                ..defaults
            },
        }
    }
}

/// Reject series that cannot name any file
pub fn validate_series(series: ExpectedSeries) -> Result<ExpectedSeries> {
    if series.step == 0 {
        bail!("series step must be greater than 0");
    }
    if series.first > series.last {
        bail!(
            "series first ({}) is greater than last ({})",
            series.first,
            series.last
        );
    }
    if series.last_block_end().is_none() {
        bail!(
            "series {}..={} step {} runs past the largest record number",
            series.first,
            series.last,
            series.step
        );
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.input.dir, PathBuf::from("."));
        assert_eq!(config.input.pattern, "pubmed_*_to_*.xml");
        assert_eq!(config.series.last, 3600);
        assert_eq!(config.series.step, 100);
        assert_eq!(config.output.ids_csv, "article_ids.csv");
        assert_eq!(config.report.sample_articles, 5);
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
[input]
dir = "/data/pubmed"

[series]
last = 500
step = 50

[output]
dir = "/tmp/reports"
ids_csv = "ids.csv"

[report]
abstract_chars = 80
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.input.dir, PathBuf::from("/data/pubmed"));
        // unset keys keep defaults
        assert_eq!(config.input.pattern, "pubmed_*_to_*.xml");
        assert_eq!(config.series.first, 0);
        assert_eq!(config.series.step, 50);

        let scan = config.scan_config();
        assert_eq!(scan.series.file_names().len(), 11);
        assert_eq!(scan.ids_csv_path(), PathBuf::from("/tmp/reports/ids.csv"));
        assert_eq!(scan.samples.abstract_chars, 80);
        assert_eq!(scan.samples.max_articles, 5);
        assert_eq!(scan.samples.max_authors, 3);
    }

    #[test]
    fn zero_step_rejected() {
        let err = Config::from_toml("[series]\nstep = 0\n").unwrap_err();
        assert!(format!("{err:#}").contains("step must be greater than 0"));
    }

    #[test]
    fn inverted_series_rejected() {
        assert!(Config::from_toml("[series]\nfirst = 200\nlast = 100\n").is_err());
    }

    #[test]
    fn overflowing_series_rejected() {
        let series = ExpectedSeries {
            first: usize::MAX - 10,
            last: usize::MAX - 10,
            step: 100,
        };
        let err = validate_series(series).unwrap_err();
        assert!(err.to_string().contains("runs past the largest record number"));
    }

    #[test]
    fn unknown_type_rejected() {
        assert!(Config::from_toml("[series]\nstep = \"ten\"\n").is_err());
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pmscan.toml");
        std::fs::write(&path, "[input]\npattern = \"*.xml\"\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.input.pattern, "*.xml");
    }

    #[test]
    fn from_file_missing() {
        let err = Config::from_file(Path::new("/nonexistent/pmscan.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
