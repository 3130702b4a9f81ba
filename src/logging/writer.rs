//! Log Writer - background task appending log entries to a file
//!
//! Entries are drained from a record queue by a single consumer and appended,
//! newline-terminated, to the target file. A failed write is reported and
//! the writer moves on to the next entry.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

use super::entry::LogEntry;
use super::ApiLogger;
use crate::pipeline::{QueueClosed, QueueProducer, RecordQueue, RecordSink, Worker, DEFAULT_POLL_INTERVAL};

struct FileSink {
    path: PathBuf,
    failures: usize,
}

impl FileSink {
    async fn append(&self, entry: &LogEntry) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let mut line = String::with_capacity(entry.as_str().len() + 1);
        line.push_str(entry.as_str());
        line.push('\n');
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

#[async_trait]
impl RecordSink<LogEntry> for FileSink {
    async fn accept(&mut self, entry: LogEntry) {
        if let Err(e) = self.append(&entry).await {
            self.failures += 1;
            error!(path = %self.path.display(), error = %e, "Error writing to log file");
        }
    }

    async fn finish(&mut self) {
        if self.failures > 0 {
            error!(
                path = %self.path.display(),
                failures = self.failures,
                "Log writer finished with failed writes"
            );
        }
    }
}

/// Owns the log queue and the task writing it to disk
pub struct LogWriter {
    path: PathBuf,
    producer: QueueProducer<LogEntry>,
    worker: Worker,
}

impl LogWriter {
    /// Start a writer appending to `path` on the current tokio runtime
    pub fn start(path: impl AsRef<Path>) -> Self {
        Self::start_with_poll_interval(path, DEFAULT_POLL_INTERVAL)
    }

    pub fn start_with_poll_interval(path: impl AsRef<Path>, poll_interval: Duration) -> Self {
        let path = path.as_ref().to_path_buf();
        let (producer, consumer) = RecordQueue::new();
        let sink = FileSink {
            path: path.clone(),
            failures: 0,
        };
        let worker = Worker::spawn(consumer, sink, poll_interval);

        Self {
            path,
            producer,
            worker,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Queue an entry for writing. Never blocks.
    pub fn enqueue(&self, entry: LogEntry) -> Result<(), QueueClosed> {
        self.producer.enqueue(entry)
    }

    /// A cloneable request/response logger feeding this writer
    pub fn logger(&self) -> ApiLogger {
        ApiLogger::new(self.producer.clone())
    }

    /// Stop after every queued entry has been written.
    ///
    /// Returns the number of entries processed.
    pub async fn stop(self) -> usize {
        let processed = self.worker.stop().await;
        info!(path = %self.path.display(), processed, "Log writer stopped");
        processed
    }
}
