/*!
 * Batch translation orchestration.
 *
 * This module owns the lifecycle of a translation batch:
 *
 * - `job`: The immutable batch descriptor and its state machine
 * - `worker`: The sequential translate/commit/record loop
 * - `manager`: Batch submission, single-flight ownership, and cancellation
 */

// Re-export main types for easier usage
pub use self::job::{BatchJob, BatchOutcome, BatchState, FileTask, TranslateFilesParams};
pub use self::manager::BatchManager;
pub use self::worker::{BatchWorker, PACING_DELAY};

// Submodules
pub mod job;
pub mod manager;
pub mod worker;
