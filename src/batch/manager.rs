/*!
 * Batch manager: submission, single-flight ownership, and cancellation.
 *
 * A manager owns one translator capability and at most one running batch.
 * Submitting a second batch while one is active is rejected instead of
 * silently replacing the running worker; the caller is expected to wait for
 * `BatchCompleted` (and reap the outcome with [`BatchManager::join_batch`])
 * before starting the next one.
 */

use log::{debug, info};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use anyhow::{Context, Result};

use crate::app_config::TranslationProvider;
use crate::errors::BatchError;
use crate::events::{BatchEvent, EventBus};
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::store::{RecordStore, SqliteRecordStore};
use crate::translation::Translator;

use super::job::{BatchJob, BatchOutcome, BatchState, TranslateFilesParams};
use super::worker::{BatchWorker, SharedBatchState};

/// The running batch owned by a manager
struct ActiveBatch {
    /// Batch identifier
    id: Uuid,
    /// Cooperative stop flag shared with the worker
    stop: Arc<AtomicBool>,
    /// Externally observable state
    state: SharedBatchState,
    /// Handle of the spawned worker task
    handle: JoinHandle<BatchOutcome>,
}

/// Mutable manager state behind one lock
struct ManagerInner {
    /// Directory the batches operate on
    working_dir: Option<PathBuf>,
    /// Record store bound to the working directory
    store: Option<Arc<dyn RecordStore>>,
    /// Backend selection snapshotted into each batch
    provider: TranslationProvider,
    /// Model identifier snapshotted into each batch
    model: String,
    /// The single in-flight batch, if any
    active: Option<ActiveBatch>,
}

/// Manager coordinating translation batches over one working directory
pub struct BatchManager {
    /// The translation backend
    translator: Arc<dyn Translator>,
    /// Event dispatcher shared with workers
    events: EventBus,
    /// Mutable state
    inner: Mutex<ManagerInner>,
}

impl BatchManager {
    /// Create a manager around a translator capability
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        let provider = TranslationProvider::default();
        let model = provider.default_model();

        Self {
            translator,
            events: EventBus::new(),
            inner: Mutex::new(ManagerInner {
                working_dir: None,
                store: None,
                provider,
                model,
                active: None,
            }),
        }
    }

    /// Bind the manager to a working directory and backend selection.
    ///
    /// Must be called before any batch; opens (or creates) the record store
    /// inside the directory.
    pub fn initialize<P: AsRef<Path>>(
        &self,
        working_dir: P,
        provider: Option<TranslationProvider>,
        model: Option<String>,
    ) -> Result<()> {
        let working_dir = working_dir.as_ref().to_path_buf();

        if !FileManager::dir_exists(&working_dir) {
            anyhow::bail!("Working directory does not exist: {:?}", working_dir);
        }

        let store = SqliteRecordStore::new(&working_dir)
            .with_context(|| format!("Failed to open record store in {:?}", working_dir))?;

        let mut inner = self.inner.lock();
        if let Some(provider) = provider {
            inner.model = model.unwrap_or_else(|| provider.default_model());
            inner.provider = provider;
        } else if let Some(model) = model {
            inner.model = model;
        }
        inner.working_dir = Some(working_dir.clone());
        inner.store = Some(Arc::new(store));

        info!("Batch manager initialized on {:?}", working_dir);
        Ok(())
    }

    /// Subscribe to the batch event channel
    pub fn subscribe(&self) -> broadcast::Receiver<BatchEvent> {
        self.events.subscribe()
    }

    /// Start one translation batch.
    ///
    /// Fails fast, with an `Error` event, when the manager is uninitialized,
    /// when a batch is already running, or when the language pair is
    /// degenerate. Must be called from within a tokio runtime.
    pub fn translate_files(&self, params: TranslateFilesParams) -> Result<Uuid, BatchError> {
        let mut inner = self.inner.lock();

        let (working_dir, store) = match (&inner.working_dir, &inner.store) {
            (Some(dir), Some(store)) => (dir.clone(), store.clone()),
            _ => {
                self.events
                    .error("Working directory has not been initialized");
                return Err(BatchError::NotInitialized);
            }
        };

        if let Some(active) = &inner.active {
            if !active.handle.is_finished() {
                self.events
                    .error("A translation batch is already running");
                return Err(BatchError::AlreadyRunning);
            }
        }

        if language_utils::language_codes_match(&params.source_lang, &params.target_lang) {
            let message = format!(
                "Source and target language are the same: {}",
                params.source_lang
            );
            self.events.error(message.clone());
            return Err(BatchError::InvalidParameters(message));
        }

        let job = BatchJob {
            id: Uuid::new_v4(),
            files: params.files,
            source_lang: params.source_lang,
            target_lang: params.target_lang,
            api_key: params.api_key,
            provider: inner.provider.clone(),
            model: inner.model.clone(),
            custom_terms: params.custom_terms,
            segment_size: params.segment_size,
        };

        let id = job.id;
        let stop = Arc::new(AtomicBool::new(false));
        let state: SharedBatchState = Arc::new(Mutex::new(BatchState::Idle));

        let worker = BatchWorker::new(
            job,
            working_dir,
            store,
            self.translator.clone(),
            self.events.clone(),
            params.status_callback,
            stop.clone(),
            state.clone(),
        );

        debug!("Spawning worker for batch {}", id);
        let handle = tokio::spawn(worker.run());

        inner.active = Some(ActiveBatch {
            id,
            stop,
            state,
            handle,
        });

        Ok(id)
    }

    /// Request cancellation of the active batch, if any.
    ///
    /// Idempotent and callable from any context; the worker observes the
    /// request at the top of its next iteration.
    pub fn stop_translation(&self) {
        let inner = self.inner.lock();

        if let Some(active) = &inner.active {
            if !active.handle.is_finished() {
                info!("Stop requested for batch {}", active.id);
                active.stop.store(true, Ordering::SeqCst);
                self.events.progress("Stopping translation...");
            }
        }
    }

    /// State of the most recent batch, `Idle` when none was ever started
    pub fn batch_state(&self) -> BatchState {
        let inner = self.inner.lock();
        inner
            .active
            .as_ref()
            .map(|active| *active.state.lock())
            .unwrap_or(BatchState::Idle)
    }

    /// Whether a batch is currently running
    pub fn is_batch_active(&self) -> bool {
        let inner = self.inner.lock();
        inner
            .active
            .as_ref()
            .map(|active| !active.handle.is_finished())
            .unwrap_or(false)
    }

    /// Await the current batch and reap its outcome.
    ///
    /// Intended for use after `BatchCompleted` was observed; releases the
    /// manager's reference to the finished worker task.
    pub async fn join_batch(&self) -> Option<BatchOutcome> {
        let active = { self.inner.lock().active.take() };

        match active {
            Some(active) => active.handle.await.ok(),
            None => None,
        }
    }

    /// Mapping of supported language codes to display names
    pub fn get_supported_languages(&self) -> std::collections::BTreeMap<String, String> {
        self.translator.supported_languages()
    }

    /// Read the stored custom terms, empty when uninitialized
    pub async fn get_custom_terms(&self) -> Result<String> {
        let store = { self.inner.lock().store.clone() };

        match store {
            Some(store) => store.get_custom_terms().await,
            None => Ok(String::new()),
        }
    }
}
