//! Report rendering
//!
//! - Tabular: CSV with a fixed column set, one row per outcome
//! - Structured: JSON document `{ "metrics": ..., "results": [...] }`

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::metrics::MetricsSnapshot;
use super::outcome::{format_timestamp, TestOutcome};
use super::ReportError;

/// Column order of the tabular report
pub const TABULAR_COLUMNS: [&str; 9] = [
    "test_name",
    "test_class",
    "status",
    "execution_time",
    "timestamp",
    "endpoint",
    "method",
    "response_code",
    "error_message",
];

/// Structured report document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredReport {
    pub metrics: MetricsSnapshot,
    pub results: Vec<TestOutcome>,
}

/// Render outcomes as CSV, header row first
pub fn render_tabular(outcomes: &[TestOutcome]) -> String {
    let mut csv = TABULAR_COLUMNS.join(",");
    csv.push_str("\r\n");

    for outcome in outcomes {
        let response_code = outcome
            .response_code
            .map(|code| code.to_string())
            .unwrap_or_default();
        let row = [
            csv_field(&outcome.test_name),
            csv_field(&outcome.test_class),
            Cow::Borrowed(outcome.status.as_str()),
            Cow::Owned(format_seconds(outcome.execution_time)),
            Cow::Owned(format_timestamp(&outcome.timestamp)),
            csv_field(&outcome.endpoint),
            csv_field(&outcome.method),
            Cow::Owned(response_code),
            csv_field(outcome.error_message.as_deref().unwrap_or("")),
        ];
        csv.push_str(&row.join(","));
        csv.push_str("\r\n");
    }

    csv
}

/// Whole numbers keep a trailing `.0`, matching the JSON report
fn format_seconds(seconds: f64) -> String {
    if seconds.is_finite() && seconds.fract() == 0.0 {
        format!("{:.1}", seconds)
    } else {
        seconds.to_string()
    }
}

/// Render metrics and outcomes as pretty-printed JSON
pub fn render_structured(
    metrics: MetricsSnapshot,
    results: Vec<TestOutcome>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&StructuredReport { metrics, results })
}

/// Quote a field when it contains a delimiter, quote, or line break
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Write `contents` to `path`, creating parent directories and replacing any existing file
pub(crate) async fn write_report(path: &Path, contents: &str) -> Result<PathBuf, ReportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ReportError::io(parent, e))?;
        }
    }

    tokio::fs::write(path, contents)
        .await
        .map_err(|e| ReportError::io(path, e))?;

    Ok(path.to_path_buf())
}
