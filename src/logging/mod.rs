//! Request/response logging
//!
//! This module contains:
//! - `mask` - Redaction of sensitive headers and body fields
//! - `entry` - Formatting of request and response log blocks
//! - `writer` - Background task appending entries to the log file
//!
//! Masking happens when an entry is formatted, before it is queued, so the
//! writer only ever sees sanitized text.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::pipeline::QueueProducer;

pub mod entry;
pub mod mask;
pub mod writer;

pub use entry::LogEntry;
pub use mask::{
    is_sensitive_header, mask_body, mask_headers, REDACTION_MARKER, SENSITIVE_BODY_FIELDS,
    SENSITIVE_HEADERS,
};
pub use writer::LogWriter;

/// Producer-side handle that formats and queues request/response entries
#[derive(Debug, Clone)]
pub struct ApiLogger {
    producer: QueueProducer<LogEntry>,
}

impl ApiLogger {
    pub fn new(producer: QueueProducer<LogEntry>) -> Self {
        Self { producer }
    }

    /// Queue a request entry and return its timestamp
    pub fn log_request(
        &self,
        method: &str,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: Option<&Value>,
    ) -> DateTime<Utc> {
        let timestamp = Utc::now();
        self.push(LogEntry::request(timestamp, method, url, headers, body));
        timestamp
    }

    /// Queue a response entry timed against `request_timestamp`
    pub fn log_response(
        &self,
        status: u16,
        headers: &BTreeMap<String, String>,
        body: Option<&Value>,
        request_timestamp: DateTime<Utc>,
    ) {
        let timestamp = Utc::now();
        let duration_ms = (timestamp - request_timestamp).num_milliseconds();
        self.push(LogEntry::response(timestamp, status, headers, body, duration_ms));
    }

    fn push(&self, entry: LogEntry) {
        if self.producer.enqueue(entry).is_err() {
            warn!("Log writer is stopped, log entry dropped");
        }
    }
}
