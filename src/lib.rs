//! # API Harness
//!
//! An API testing harness that records every request/response exchange and
//! every test outcome through background queues, so test execution never
//! blocks on file I/O.
//!
//! ## Features
//!
//! - **Masked request logging** - Sensitive headers and body fields are redacted before they reach disk
//! - **Outcome reporting** - Aggregate pass/fail metrics and response times per endpoint
//! - **CSV and JSON export** - Deterministic reports with one row per test
//! - **Declarative YAML suites** - Describe requests and expectations without writing code
//! - **Drain on stop** - Every queued record is written before shutdown completes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use api_harness::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = HarnessConfig::for_env("config", "dev")?;
//!     let writer = LogWriter::start(&config.log_file);
//!     let client = ApiClient::new(config)?.with_logger(writer.logger());
//!     let store = ReportStore::start();
//!
//!     let test = ApiTest::new("test_list_users", "UserApi", "/users");
//!     let _ = test.run(&client, &store, RequestOptions::new()).await;
//!
//!     store.stop().await;
//!     writer.stop().await;
//!     store.export_all("reports").await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod suite;
pub mod validation;

// Re-export main types
pub use client::{
    ApiClient, ClientError, HttpRequest, HttpResponse, HttpTransport, Method, RequestOptions,
    ReqwestTransport,
};
pub use config::{AuthConfig, AuthKind, ConfigError, Credentials, HarnessConfig};
pub use logging::{mask_body, mask_headers, ApiLogger, LogEntry, LogWriter};
pub use pipeline::{QueueClosed, QueueConsumer, QueueProducer, RecordQueue, RecordSink, Worker};
pub use report::{
    MetricsAggregator, MetricsSnapshot, ReportError, ReportStore, TestOutcome, TestStatus,
};
pub use suite::{LoadError, SuiteLoader, SuiteRunner, SuiteSummary, TestCase, TestSuite};
pub use validation::{ApiTest, JsonSchemaValidator, SchemaValidator, TestError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::client::{ApiClient, HttpResponse, Method, RequestOptions};
    pub use crate::config::{AuthConfig, HarnessConfig};
    pub use crate::logging::{ApiLogger, LogWriter};
    pub use crate::report::{MetricsSnapshot, ReportStore, TestOutcome, TestStatus};
    pub use crate::suite::{SuiteLoader, SuiteRunner, SuiteSummary, TestSuite};
    pub use crate::validation::{ApiTest, TestError};
}
