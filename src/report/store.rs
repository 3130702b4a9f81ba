//! Report Store - canonical outcome history and metrics
//!
//! Producers call `submit`, which only enqueues. A single background consumer
//! appends each outcome to the history and folds it into the metrics while
//! holding the history write lock. Exports take the read lock, so every
//! export sees a history and a metrics snapshot that agree with each other.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::export::{render_structured, render_tabular, write_report};
use super::metrics::{MetricsAggregator, MetricsSnapshot};
use super::outcome::TestOutcome;
use super::ReportError;
use crate::pipeline::{QueueClosed, QueueProducer, RecordQueue, RecordSink, Worker, DEFAULT_POLL_INTERVAL};

/// File name used by `export_all` for the tabular report
pub const DEFAULT_TABULAR_FILE: &str = "test_report.csv";

/// File name used by `export_all` for the structured report
pub const DEFAULT_STRUCTURED_FILE: &str = "test_report.json";

struct HistorySink {
    history: Arc<RwLock<Vec<TestOutcome>>>,
    metrics: Arc<MetricsAggregator>,
}

#[async_trait]
impl RecordSink<TestOutcome> for HistorySink {
    async fn accept(&mut self, outcome: TestOutcome) {
        let mut history = self.history.write().await;
        debug!(test = %outcome.test_name, status = %outcome.status, "Recording outcome");
        history.push(outcome);
        let latest = history.len() - 1;
        self.metrics.ingest(&history[latest]);
    }
}

/// Owns the outcome history and metrics for one harness run
pub struct ReportStore {
    producer: QueueProducer<TestOutcome>,
    history: Arc<RwLock<Vec<TestOutcome>>>,
    metrics: Arc<MetricsAggregator>,
    worker: Mutex<Option<Worker>>,
}

impl ReportStore {
    /// Start the store and its consumer task on the current tokio runtime
    pub fn start() -> Self {
        Self::start_with_poll_interval(DEFAULT_POLL_INTERVAL)
    }

    pub fn start_with_poll_interval(poll_interval: Duration) -> Self {
        let (producer, consumer) = RecordQueue::new();
        let history = Arc::new(RwLock::new(Vec::new()));
        let metrics = Arc::new(MetricsAggregator::new());

        let sink = HistorySink {
            history: history.clone(),
            metrics: metrics.clone(),
        };
        let worker = Worker::spawn(consumer, sink, poll_interval);

        Self {
            producer,
            history,
            metrics,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Queue an outcome for recording. Never blocks.
    pub fn submit(&self, outcome: TestOutcome) -> Result<(), QueueClosed> {
        self.producer.enqueue(outcome).map_err(|e| {
            warn!("Report store is stopped, outcome dropped");
            e
        })
    }

    /// Current aggregated metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Copy of the outcomes recorded so far, in consumption order
    pub async fn results(&self) -> Vec<TestOutcome> {
        self.history.read().await.clone()
    }

    /// Number of outcomes recorded so far
    pub async fn len(&self) -> usize {
        self.history.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.history.read().await.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    /// Write the history as CSV to `path`, replacing any existing file
    pub async fn export_tabular(&self, path: impl AsRef<Path>) -> Result<PathBuf, ReportError> {
        let csv = {
            let history = self.history.read().await;
            render_tabular(&history)
        };
        let path = write_report(path.as_ref(), &csv).await?;
        info!(path = %path.display(), "Exported tabular report");
        Ok(path)
    }

    /// Write metrics and history as JSON to `path`, replacing any existing file
    pub async fn export_structured(&self, path: impl AsRef<Path>) -> Result<PathBuf, ReportError> {
        let (metrics, results) = {
            let history = self.history.read().await;
            (self.metrics.snapshot(), history.clone())
        };
        let json = render_structured(metrics, results)?;
        let path = write_report(path.as_ref(), &json).await?;
        info!(path = %path.display(), "Exported structured report");
        Ok(path)
    }

    /// Write both reports into `dir` under their default file names
    pub async fn export_all(&self, dir: impl AsRef<Path>) -> Result<(PathBuf, PathBuf), ReportError> {
        let dir = dir.as_ref();
        let tabular = self.export_tabular(dir.join(DEFAULT_TABULAR_FILE)).await?;
        let structured = self.export_structured(dir.join(DEFAULT_STRUCTURED_FILE)).await?;
        Ok((tabular, structured))
    }

    /// Stop the consumer after it has drained every submitted outcome.
    ///
    /// Returns the number of outcomes processed by the consumer. Calling
    /// `stop` again is a no-op that returns 0.
    pub async fn stop(&self) -> usize {
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match worker {
            Some(worker) => {
                let processed = worker.stop().await;
                info!(processed, "Report store stopped");
                processed
            }
            None => 0,
        }
    }
}
