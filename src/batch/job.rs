/*!
 * Batch descriptors and the batch state machine.
 */

use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::app_config::TranslationProvider;
use crate::events::StatusCallback;

/// One unit of work: a file identified by name within the working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    /// Name of the file, relative to the working directory
    pub name: String,
}

impl FileTask {
    /// Create a new file task
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Resolve this task to a path inside a working directory
    pub fn resolve_in(&self, working_dir: &Path) -> PathBuf {
        working_dir.join(&self.name)
    }
}

/// State machine of one batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Submitted but not yet running
    Idle,
    /// The worker loop is executing
    Running,
    /// The loop finished on its own
    Completed,
    /// A stop request ended the loop early
    Stopped,
    /// An orchestrator-level error ended the run; per-file failures never cause this
    Failed,
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchState::Idle => write!(f, "idle"),
            BatchState::Running => write!(f, "running"),
            BatchState::Completed => write!(f, "completed"),
            BatchState::Stopped => write!(f, "stopped"),
            BatchState::Failed => write!(f, "failed"),
        }
    }
}

/// Immutable descriptor of one translation batch
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// Unique identifier of this batch
    pub id: Uuid,
    /// Files to translate, processed strictly in order
    pub files: Vec<FileTask>,
    /// Source language code
    pub source_lang: String,
    /// Target language code
    pub target_lang: String,
    /// Credential for the provider API
    pub api_key: String,
    /// Provider the batch was submitted against
    pub provider: TranslationProvider,
    /// Model identifier
    pub model: String,
    /// Custom terminology glossary, possibly empty
    pub custom_terms: String,
    /// Optional characters-per-segment budget
    pub segment_size: Option<usize>,
}

/// Final accounting of one batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Terminal state of the run
    pub state: BatchState,
    /// Number of files in the batch
    pub total: usize,
    /// Number of files translated and committed
    pub succeeded: usize,
}

/// Caller-facing parameters for starting a batch
#[derive(Clone)]
pub struct TranslateFilesParams {
    /// Files to translate
    pub files: Vec<FileTask>,
    /// Source language code
    pub source_lang: String,
    /// Target language code
    pub target_lang: String,
    /// Credential for the provider API
    pub api_key: String,
    /// Optional per-file status hook
    pub status_callback: Option<StatusCallback>,
    /// Custom terminology glossary
    pub custom_terms: String,
    /// Optional characters-per-segment budget
    pub segment_size: Option<usize>,
}

impl TranslateFilesParams {
    /// Create parameters with the required fields
    pub fn new(
        files: Vec<FileTask>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            files,
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            api_key: api_key.into(),
            status_callback: None,
            custom_terms: String::new(),
            segment_size: None,
        }
    }

    /// Attach a per-file status callback
    pub fn with_status_callback(mut self, callback: StatusCallback) -> Self {
        self.status_callback = Some(callback);
        self
    }

    /// Attach a custom terminology glossary
    pub fn with_custom_terms(mut self, terms: impl Into<String>) -> Self {
        self.custom_terms = terms.into();
        self
    }

    /// Set the characters-per-segment budget
    pub fn with_segment_size(mut self, segment_size: usize) -> Self {
        self.segment_size = Some(segment_size);
        self
    }
}
