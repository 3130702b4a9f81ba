//! Record queue
//!
//! An unbounded FIFO channel. Producers never block and may be cloned freely;
//! exactly one consumer drains the queue.

use std::time::Duration;

use tokio::sync::mpsc;

/// Returned when an item is enqueued after the consumer has gone away
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Queue closed: consumer is no longer running")]
pub struct QueueClosed;

/// Result of a blocking dequeue
#[derive(Debug, PartialEq, Eq)]
pub enum Dequeued<T> {
    /// The next item in FIFO order
    Item(T),
    /// The timeout elapsed with nothing queued
    Empty,
    /// Every producer has been dropped and the queue is drained
    Closed,
}

/// Constructor for a producer/consumer pair
pub struct RecordQueue;

impl RecordQueue {
    #[allow(clippy::new_ret_no_self)]
    pub fn new<T>() -> (QueueProducer<T>, QueueConsumer<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (QueueProducer { tx }, QueueConsumer { rx })
    }
}

/// Producer side of a record queue
#[derive(Debug)]
pub struct QueueProducer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for QueueProducer<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> QueueProducer<T> {
    /// Enqueue an item without blocking
    pub fn enqueue(&self, item: T) -> Result<(), QueueClosed> {
        self.tx.send(item).map_err(|_| QueueClosed)
    }

    /// Whether the consumer side has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side of a record queue
#[derive(Debug)]
pub struct QueueConsumer<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> QueueConsumer<T> {
    /// Wait up to `timeout` for the next item
    pub async fn dequeue_blocking(&mut self, timeout: Duration) -> Dequeued<T> {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(item)) => Dequeued::Item(item),
            Ok(None) => Dequeued::Closed,
            Err(_) => Dequeued::Empty,
        }
    }

    /// Take the next item if one is already queued
    pub fn try_dequeue(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}
