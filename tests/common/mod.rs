#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use api_harness::client::{ClientError, HttpRequest, HttpResponse, HttpTransport};
use api_harness::{ApiClient, HarnessConfig, TestOutcome, TestStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tempfile::TempDir;

pub const POLL: Duration = Duration::from_millis(10);

pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

pub fn write_suite(dir: &Path, filename: &str, content: &str) {
    fs::write(dir.join(filename), content).expect("Failed to write suite file");
}

/// Config pointing at a fake host with no retry delay
pub fn test_config() -> HarnessConfig {
    HarnessConfig {
        base_url: "http://api.test".to_string(),
        retry_delay: 0.0,
        ..HarnessConfig::default()
    }
}

pub fn fixed_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

pub fn outcome(
    name: &str,
    status: TestStatus,
    seconds: f64,
    method: &str,
    endpoint: &str,
    code: Option<u16>,
) -> TestOutcome {
    let mut outcome = TestOutcome::new(name, "Group", endpoint, method)
        .with_timestamp(fixed_time())
        .with_execution_time(seconds);
    outcome.response_code = code;
    match status {
        TestStatus::Success => outcome,
        TestStatus::Failed => outcome.failed(vec![format!("{} failed", name)]),
        TestStatus::Error => outcome.errored(format!("{} errored", name)),
    }
}

/// Replays scripted responses in order and records every request it sees
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, ClientError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: HttpResponse) -> Self {
        self.script.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn fail(self, error: ClientError) -> Self {
        self.script.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn attempts(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::InvalidRequest("script exhausted".to_string())))
    }
}

pub fn client_with(config: HarnessConfig, transport: &Arc<ScriptedTransport>) -> ApiClient {
    ApiClient::with_transport(config, transport.clone()).expect("valid config")
}
