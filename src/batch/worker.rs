/*!
 * The batch worker: a sequential translate/commit/record loop.
 *
 * One worker consumes one [`BatchJob`]. Files are processed strictly in
 * list order, one at a time; already-recorded files are skipped; every
 * attempt ends in a `FileCompleted` event; a fixed pacing delay separates
 * consecutive attempts to respect provider rate limits. A stop request is
 * observed at the top of each iteration, never mid-file. Whatever happens,
 * the `BatchCompleted` finalizer fires exactly once.
 */

use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::events::{EventBus, STATUS_ERROR, STATUS_TRANSLATED, StatusCallback};
use crate::file_utils::FileManager;
use crate::store::RecordStore;
use crate::translation::{TranslateRequest, Translator};

use super::job::{BatchJob, BatchOutcome, BatchState, FileTask};

/// Fixed delay between consecutive translation attempts
pub const PACING_DELAY: Duration = Duration::from_secs(5);

/// Shared, externally observable state of one batch run
pub type SharedBatchState = Arc<Mutex<BatchState>>;

/// Worker executing one translation batch
pub struct BatchWorker {
    /// The batch descriptor
    job: BatchJob,
    /// Directory the file names resolve against
    working_dir: PathBuf,
    /// Ledger of completed translations
    store: Arc<dyn RecordStore>,
    /// The translation backend
    translator: Arc<dyn Translator>,
    /// Event dispatcher
    events: EventBus,
    /// Optional per-file status hook
    status_callback: Option<StatusCallback>,
    /// Cooperative stop flag, shared with the manager
    stop: Arc<AtomicBool>,
    /// Externally observable state
    state: SharedBatchState,
    /// Files translated and committed so far
    succeeded: usize,
}

impl BatchWorker {
    /// Create a worker for one batch
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        job: BatchJob,
        working_dir: PathBuf,
        store: Arc<dyn RecordStore>,
        translator: Arc<dyn Translator>,
        events: EventBus,
        status_callback: Option<StatusCallback>,
        stop: Arc<AtomicBool>,
        state: SharedBatchState,
    ) -> Self {
        Self {
            job,
            working_dir,
            store,
            translator,
            events,
            status_callback,
            stop,
            state,
            succeeded: 0,
        }
    }

    /// Run the batch to completion, stop, or failure.
    ///
    /// `BatchCompleted` is emitted exactly once on every path out of this
    /// method; it is the caller's signal to release the task.
    pub async fn run(mut self) -> BatchOutcome {
        *self.state.lock() = BatchState::Running;
        info!(
            "Batch {} started: {} file(s), {} -> {}, provider {}",
            self.job.id,
            self.job.files.len(),
            self.job.source_lang,
            self.job.target_lang,
            self.job.provider
        );

        let final_state = match self.run_inner().await {
            Ok(true) => BatchState::Stopped,
            Ok(false) => BatchState::Completed,
            Err(e) => {
                warn!("Batch {} failed: {:#}", self.job.id, e);
                self.events
                    .error(format!("Translation batch failed: {}", e));
                BatchState::Failed
            }
        };

        *self.state.lock() = final_state;
        info!(
            "Batch {} finished as {} ({} of {} succeeded)",
            self.job.id,
            final_state,
            self.succeeded,
            self.job.files.len()
        );

        // Unconditional finalizer, fired exactly once per run
        self.events.batch_completed();

        BatchOutcome {
            state: final_state,
            total: self.job.files.len(),
            succeeded: self.succeeded,
        }
    }

    /// The loop body; returns whether a stop request ended the run
    async fn run_inner(&mut self) -> Result<bool> {
        if !self.job.custom_terms.trim().is_empty() {
            self.store
                .save_custom_terms(&self.job.custom_terms)
                .await
                .context("Failed to save custom terms")?;
        }

        let total = self.job.files.len();

        for index in 0..total {
            // Stop is only ever observed here, at the top of an iteration
            if self.stop_requested() {
                info!("Batch {} stopping before file {}", self.job.id, index + 1);
                return Ok(true);
            }

            let file = self.job.files[index].clone();
            let position = index + 1;
            self.events.progress(format!(
                "Translating file {} of {}: {}",
                position, total, file.name
            ));

            match self.store.is_translated(&file.name).await {
                Ok(true) => {
                    // Skip check is by filename only; no completion event,
                    // no pacing delay for skipped files
                    debug!("{} already translated, skipping", file.name);
                    continue;
                }
                Ok(false) => {
                    let success = self.translate_single_file(&file).await;

                    if success {
                        self.succeeded += 1;
                        if let Err(e) = self
                            .store
                            .add_record(&file.name, &self.job.source_lang, &self.job.target_lang)
                            .await
                        {
                            // The content is already committed; the missing
                            // record only costs a redundant retranslation later
                            self.events.error(format!(
                                "Failed to record completion of {}: {}",
                                file.name, e
                            ));
                        }
                    }

                    self.report_file_result(&file.name, success);
                }
                Err(e) => {
                    // Retranslating silently could clobber prior work, so a
                    // lookup error counts as a per-file failure
                    self.events.error(format!(
                        "Failed to check prior translation of {}: {}",
                        file.name, e
                    ));
                    self.report_file_result(&file.name, false);
                }
            }

            if position < total && !self.stop_requested() {
                tokio::time::sleep(PACING_DELAY).await;
            }
        }

        let stopped = self.stop_requested();
        if !stopped {
            self.events.progress(format!(
                "Batch complete: {} of {} files translated successfully.",
                self.succeeded, total
            ));
        }

        Ok(stopped)
    }

    /// Translate one file and commit the result; failures become events
    async fn translate_single_file(&self, file: &FileTask) -> bool {
        let input_path = file.resolve_in(&self.working_dir);
        let temp_path = FileManager::pending_path(&input_path);

        match self
            .translate_and_commit(&file.name, &input_path, &temp_path)
            .await
        {
            Ok(()) => {
                debug!("Committed translation of {}", file.name);
                true
            }
            Err(e) => {
                // {:#} keeps the underlying provider message in the event
                self.events
                    .error(format!("Failed to translate {}: {:#}", file.name, e));
                // Cleanup is best-effort and must never mask the error above
                FileManager::remove_quietly(&temp_path);
                false
            }
        }
    }

    /// Read, translate, and atomically replace one file
    async fn translate_and_commit(
        &self,
        filename: &str,
        input_path: &Path,
        temp_path: &Path,
    ) -> Result<()> {
        let text = FileManager::read_to_string(input_path)?;

        let request = TranslateRequest {
            text,
            source_lang: self.job.source_lang.clone(),
            target_lang: self.job.target_lang.clone(),
            api_key: self.job.api_key.clone(),
            model: self.job.model.clone(),
            custom_terms: self.job.custom_terms.clone(),
            segment_size: self.job.segment_size,
        };

        let translated = self
            .translator
            .translate(request)
            .await
            .with_context(|| format!("Provider call failed for {}", filename))?;

        if translated.trim().is_empty() {
            bail!("no translation obtained");
        }

        FileManager::write_to_file(temp_path, &translated)?;

        // The visible file only ever changes here, all-or-nothing
        FileManager::atomic_replace(temp_path, input_path)?;

        Ok(())
    }

    /// Emit the per-file completion event and invoke the status callback
    fn report_file_result(&self, filename: &str, success: bool) {
        self.events.file_completed(filename, success);

        if let Some(callback) = &self.status_callback {
            let label = if success { STATUS_TRANSLATED } else { STATUS_ERROR };
            callback(filename, label);
        }
    }

    fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}
