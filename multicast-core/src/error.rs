//! Error types for queue construction.
//!
//! The dispatcher itself never fails: unknown delegates, duplicate
//! registrations and messages nobody handles are all no-ops. Errors only
//! exist where a queue has to acquire an OS or runtime resource.

use thiserror::Error;

/// Errors that can occur while creating a serial queue.
#[derive(Error, Debug)]
pub enum QueueError {
    /// The worker thread could not be spawned.
    #[error("failed to spawn queue worker: {0}")]
    Spawn(#[from] std::io::Error),

    /// No async runtime is available to host the worker.
    #[error("no async runtime available to host the queue worker")]
    NoRuntime,
}
