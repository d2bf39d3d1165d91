/*!
 * Common test utilities for the batrans test suite
 */

pub mod mock_translators;

use std::path::Path;
use std::sync::Once;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::broadcast;

use batrans::events::BatchEvent;
use batrans::file_utils::FileManager;

static INIT_LOGGING: Once = Once::new();

/// Initialize test logging once for the whole suite
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Create a temporary working directory populated with the given files
pub fn create_working_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp working dir");

    for (name, content) in files {
        FileManager::write_to_file(dir.path().join(name), content)
            .expect("Failed to write test file");
    }

    dir
}

/// Read a file from the working directory
pub fn read_file(dir: &Path, name: &str) -> String {
    FileManager::read_to_string(dir.join(name)).expect("Failed to read test file")
}

/// Whether any leftover temp file is present in the directory
pub fn has_temp_files(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .expect("Failed to list working dir")
        .filter_map(|entry| entry.ok())
        .any(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with(batrans::file_utils::TEMP_PREFIX)
        })
}

/// Collect every event up to and including `BatchCompleted`.
///
/// Panics if the batch does not complete within the timeout, so a missing
/// finalizer shows up as a test failure instead of a hang.
pub async fn collect_events_until_completed(
    receiver: &mut broadcast::Receiver<BatchEvent>,
) -> Vec<BatchEvent> {
    let mut events = Vec::new();

    let collection = async {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let done = event == BatchEvent::BatchCompleted;
                    events.push(event);
                    if done {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    tokio::time::timeout(Duration::from_secs(120), collection)
        .await
        .expect("Batch did not complete in time");

    events
}

/// Names of the files that produced a `FileCompleted` event
pub fn completed_files(events: &[BatchEvent]) -> Vec<(String, bool)> {
    events
        .iter()
        .filter_map(|event| match event {
            BatchEvent::FileCompleted { filename, success } => {
                Some((filename.clone(), *success))
            }
            _ => None,
        })
        .collect()
}

/// All progress messages in emission order
pub fn progress_messages(events: &[BatchEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            BatchEvent::Progress(message) => Some(message.clone()),
            _ => None,
        })
        .collect()
}

/// All error messages in emission order
pub fn error_messages(events: &[BatchEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            BatchEvent::Error(message) => Some(message.clone()),
            _ => None,
        })
        .collect()
}

/// Number of `BatchCompleted` events
pub fn completed_count(events: &[BatchEvent]) -> usize {
    events
        .iter()
        .filter(|event| **event == BatchEvent::BatchCompleted)
        .count()
}
