//! pmscan Core - Common infrastructure for PubMed export scans
//!
//! This crate provides the pieces shared by every scan pass: locating
//! export files on disk, reading them (plain or gzipped), writing report
//! files atomically, and logging/progress output.

pub mod error;
pub mod logging;
pub mod progress;
pub mod sink;
pub mod source;

// Re-exports for convenience
pub use error::ScanError;
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use sink::{AtomicFile, write_atomic};
pub use source::{ExpectedSeries, InputFile, discover, read_xml};
