//! Single-consumer drain loop
//!
//! Both background tasks (log writer and report store) run the same loop:
//! poll the queue with a bounded timeout so the stop signal is observed
//! promptly, and on stop drain whatever is still queued before exiting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::queue::{Dequeued, QueueConsumer};

/// Default interval between stop-signal checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Destination for items drained from a queue
#[async_trait]
pub trait RecordSink<T>: Send {
    /// Handle one item. Failures are reported by the sink, never returned.
    async fn accept(&mut self, item: T);

    /// Called once after the final item has been accepted
    async fn finish(&mut self) {}
}

/// Cloneable stop flag shared between a worker handle and its loop
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    flag: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Drain `consumer` into `sink` until stopped or closed.
///
/// Returns the number of items accepted.
pub async fn run_consumer<T, S>(
    mut consumer: QueueConsumer<T>,
    mut sink: S,
    stop: StopSignal,
    poll_interval: Duration,
) -> usize
where
    T: Send,
    S: RecordSink<T>,
{
    let mut processed = 0;

    loop {
        if stop.is_triggered() {
            while let Some(item) = consumer.try_dequeue() {
                sink.accept(item).await;
                processed += 1;
            }
            debug!(processed, "Consumer stopped after draining queue");
            break;
        }

        match consumer.dequeue_blocking(poll_interval).await {
            Dequeued::Item(item) => {
                sink.accept(item).await;
                processed += 1;
            }
            Dequeued::Empty => continue,
            Dequeued::Closed => {
                debug!(processed, "All producers dropped, consumer exiting");
                break;
            }
        }
    }

    sink.finish().await;
    processed
}

/// Handle to a spawned consumer task
#[derive(Debug)]
pub struct Worker {
    stop: StopSignal,
    handle: JoinHandle<usize>,
}

impl Worker {
    /// Spawn `run_consumer` on the current tokio runtime
    pub fn spawn<T, S>(consumer: QueueConsumer<T>, sink: S, poll_interval: Duration) -> Self
    where
        T: Send + 'static,
        S: RecordSink<T> + 'static,
    {
        let stop = StopSignal::new();
        let handle = tokio::spawn(run_consumer(consumer, sink, stop.clone(), poll_interval));
        Self { stop, handle }
    }

    /// Signal the loop to stop and wait until the queue has been drained
    pub async fn stop(self) -> usize {
        self.stop.trigger();
        match self.handle.await {
            Ok(processed) => processed,
            Err(e) => {
                warn!(error = %e, "Consumer task did not finish cleanly");
                0
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
