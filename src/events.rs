/*!
 * Progress and completion events for translation batches.
 *
 * Batch workers publish their progress through a broadcast channel so that
 * any number of subscribers (CLI progress bars, log sinks, tests) can follow
 * a run without ever blocking the worker. A subscriber that falls behind
 * loses the oldest events instead of applying back-pressure.
 */

use std::sync::Arc;
use tokio::sync::broadcast;

/// Capacity of the broadcast channel backing an [`EventBus`]
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Status label passed to the status callback for a successful file
pub const STATUS_TRANSLATED: &str = "Translated";

/// Status label passed to the status callback for a failed file
pub const STATUS_ERROR: &str = "Error";

/// Per-file status hook invoked synchronously with `(filename, status label)`
pub type StatusCallback = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Events emitted by a translation batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// Human-readable progress message
    Progress(String),

    /// One file finished, successfully or not
    FileCompleted {
        /// Name of the file within the working directory
        filename: String,
        /// Whether the translation was committed
        success: bool,
    },

    /// The batch finished; fired exactly once per run
    BatchCompleted,

    /// Something went wrong; the batch may still be running
    Error(String),
}

/// Fire-and-forget dispatcher for [`BatchEvent`]s
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BatchEvent>,
}

impl EventBus {
    /// Create an event bus with the default channel capacity
    pub fn new() -> Self {
        Self::with_capacity(EVENT_CHANNEL_CAPACITY)
    }

    /// Create an event bus with an explicit channel capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all events emitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<BatchEvent> {
        self.sender.subscribe()
    }

    /// Emit a progress message
    pub fn progress(&self, message: impl Into<String>) {
        self.emit(BatchEvent::Progress(message.into()));
    }

    /// Emit a per-file completion
    pub fn file_completed(&self, filename: &str, success: bool) {
        self.emit(BatchEvent::FileCompleted {
            filename: filename.to_string(),
            success,
        });
    }

    /// Emit the batch finalizer
    pub fn batch_completed(&self) {
        self.emit(BatchEvent::BatchCompleted);
    }

    /// Emit an error report
    pub fn error(&self, message: impl Into<String>) {
        self.emit(BatchEvent::Error(message.into()));
    }

    // Dropping the send error keeps emission fire-and-forget: a bus with
    // zero subscribers is valid.
    fn emit(&self, event: BatchEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
