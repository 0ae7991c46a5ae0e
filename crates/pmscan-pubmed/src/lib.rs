//! pmscan PubMed - passes over locally exported PubMed XML files
//!
//! Each pass reads a set of `pubmed_<x0>_to_<x1>.xml` exports and produces a
//! report:
//!
//! - [`inventory`]: which files of the numbered series exist, article counts
//! - [`summary`]: bibliographic fields of every article in matching files
//! - [`ids`]: `ArticleIdList` identifiers flattened into a CSV
//! - [`dedupe`]: sort a CSV by its first column and drop repeated keys
//!
//! # Example
//!
//! ```ignore
//! use pmscan_core::ProgressContext;
//! use pmscan_pubmed::{Config, inventory};
//!
//! let config = Config {
//!     input_dir: "exports".into(),
//!     ..Default::default()
//! };
//!
//! let inv = inventory::run_inventory(&config, &ProgressContext::new())?;
//! println!("{} articles", inv.total_articles());
//! ```

pub mod config;
pub mod dedupe;
pub mod ids;
pub mod inventory;
pub mod parser;
pub mod summary;

// Re-exports
pub use config::{Config, SampleLimits};
pub use dedupe::{DedupeSummary, dedupe_csv};
pub use ids::{ArticleIdRecord, CsvShape, IdExtraction, IdStats, run_ids};
pub use inventory::{FileEntry, FileStatus, Inventory, run_inventory};
pub use parser::{PubmedArticle, count_articles, parse_pubmed_xml};
pub use summary::{FileDigest, run_summary};
