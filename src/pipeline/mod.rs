//! Producer/consumer plumbing shared by the log writer and the report store
//!
//! This module contains:
//! - `queue` - Unbounded FIFO channel with a non-blocking producer side
//! - `consumer` - The single-consumer drain loop and its lifecycle handle

pub mod consumer;
pub mod queue;

pub use consumer::{run_consumer, RecordSink, StopSignal, Worker, DEFAULT_POLL_INTERVAL};
pub use queue::{Dequeued, QueueClosed, QueueConsumer, QueueProducer, RecordQueue};
