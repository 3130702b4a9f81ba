//! Test outcome reporting
//!
//! This module contains:
//! - `outcome` - The structured record produced by every test invocation
//! - `metrics` - Thread-safe aggregation of outcomes
//! - `export` - CSV and JSON rendering
//! - `store` - The report store that consumes the outcome queue

use std::path::{Path, PathBuf};

pub mod export;
pub mod metrics;
pub mod outcome;
pub mod store;

pub use export::{render_structured, render_tabular, StructuredReport, TABULAR_COLUMNS};
pub use metrics::{MetricsAggregator, MetricsSnapshot};
pub use outcome::{format_timestamp, TestOutcome, TestStatus};
pub use store::{ReportStore, DEFAULT_STRUCTURED_FILE, DEFAULT_TABULAR_FILE};

/// Errors raised while exporting reports
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReportError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
