//! Test outcome records

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final status of one test invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    /// Every validation passed
    Success,
    /// At least one validation did not hold
    Failed,
    /// An unexpected fault occurred during execution
    Error,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Success => "SUCCESS",
            TestStatus::Failed => "FAILED",
            TestStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured record of one test invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub test_name: String,
    pub test_class: String,
    pub status: TestStatus,
    /// Seconds
    pub execution_time: f64,
    #[serde(with = "iso_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub method: String,
    pub response_code: Option<u16>,
    pub error_message: Option<String>,
    pub request_headers: Option<BTreeMap<String, String>>,
    pub response_headers: Option<BTreeMap<String, String>>,
    pub validation_errors: Option<Vec<String>>,
}

impl TestOutcome {
    /// A successful outcome stamped with the current time
    pub fn new(
        test_name: impl Into<String>,
        test_class: impl Into<String>,
        endpoint: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            test_name: test_name.into(),
            test_class: test_class.into(),
            status: TestStatus::Success,
            execution_time: 0.0,
            timestamp: Utc::now(),
            endpoint: endpoint.into(),
            method: method.into(),
            response_code: None,
            error_message: None,
            request_headers: None,
            response_headers: None,
            validation_errors: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_execution_time(mut self, seconds: f64) -> Self {
        self.execution_time = seconds;
        self
    }

    pub fn with_response_code(mut self, code: u16) -> Self {
        self.response_code = Some(code);
        self
    }

    pub fn with_request_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.request_headers = Some(headers);
        self
    }

    pub fn with_response_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.response_headers = Some(headers);
        self
    }

    /// Record validation failures. Does nothing when `messages` is empty.
    pub fn mark_failed(&mut self, messages: Vec<String>) {
        if messages.is_empty() {
            return;
        }
        self.status = TestStatus::Failed;
        self.error_message = Some(messages.join("\n"));
        self.validation_errors = Some(messages);
    }

    /// Record an execution fault
    pub fn mark_error(&mut self, message: impl Into<String>) {
        self.status = TestStatus::Error;
        self.error_message = Some(message.into());
        self.validation_errors = None;
    }

    pub fn failed(mut self, messages: Vec<String>) -> Self {
        self.mark_failed(messages);
        self
    }

    pub fn errored(mut self, message: impl Into<String>) -> Self {
        self.mark_error(message);
        self
    }

    /// "METHOD endpoint" key used for per-endpoint timing
    pub fn endpoint_key(&self) -> String {
        format!("{} {}", self.method, self.endpoint)
    }

    pub fn is_success(&self) -> bool {
        self.status == TestStatus::Success
    }
}

/// ISO-8601 UTC rendering shared by both report formats
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

pub(crate) mod iso_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(timestamp))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
