//! Formatted request/response log entries

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::mask::{mask_body, mask_headers};

const SEPARATOR_WIDTH: usize = 40;

/// An immutable, already-masked block of log text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry(String);

impl LogEntry {
    /// Wrap pre-formatted text. No masking is applied.
    pub fn raw(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn request(
        timestamp: DateTime<Utc>,
        method: &str,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: Option<&Value>,
    ) -> Self {
        let mut text = format!("[{}] REQUEST:\n{} {}\n", stamp(&timestamp), method, url);
        push_headers(&mut text, headers);
        push_body(&mut text, body);
        Self(text)
    }

    pub fn response(
        timestamp: DateTime<Utc>,
        status: u16,
        headers: &BTreeMap<String, String>,
        body: Option<&Value>,
        duration_ms: i64,
    ) -> Self {
        let mut text = format!(
            "[{}] RESPONSE ({}ms):\nStatus: {}\n",
            stamp(&timestamp),
            duration_ms,
            status
        );
        push_headers(&mut text, headers);
        push_body(&mut text, body);
        text.push_str(&"-".repeat(SEPARATOR_WIDTH));
        text.push('\n');
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn stamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn push_headers(text: &mut String, headers: &BTreeMap<String, String>) {
    if headers.is_empty() {
        return;
    }
    let lines: Vec<String> = mask_headers(headers)
        .into_iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect();
    text.push_str(&lines.join("\n"));
    text.push('\n');
}

fn push_body(text: &mut String, body: Option<&Value>) {
    let Some(body) = body.filter(|b| !is_blank(b)) else {
        return;
    };

    let rendered = match body {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(&mask_body(other)).unwrap_or_else(|_| other.to_string()),
    };
    text.push_str("Body: ");
    text.push_str(&rendered);
    text.push('\n');
}

fn is_blank(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
