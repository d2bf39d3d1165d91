/*!
 * End-to-end batch workflow tests driving the manager against real
 * working directories and record stores
 */

use std::sync::Arc;

use batrans::batch::{BatchManager, BatchState, FileTask, TranslateFilesParams};
use batrans::events::BatchEvent;
use batrans::store::{RecordStore, SqliteRecordStore};

use crate::common::mock_translators::MockTranslator;
use crate::common::{
    self, collect_events_until_completed, completed_count, completed_files, error_messages,
    init_test_logging, progress_messages,
};

fn params_for(files: &[&str]) -> TranslateFilesParams {
    TranslateFilesParams::new(
        files.iter().map(|name| FileTask::new(*name)).collect(),
        "en",
        "es",
        "test-key",
    )
}

#[tokio::test(start_paused = true)]
async fn test_batchOfThree_withOneRecorded_shouldSkipAndSummarizeTwoOfThree() {
    init_test_logging();
    let dir = common::create_working_dir(&[
        ("ch1.txt", "uno"),
        ("ch2.txt", "dos"),
        ("ch3.txt", "tres"),
    ]);

    // Record ch2 as already translated before the batch starts
    {
        let store = SqliteRecordStore::new(dir.path()).unwrap();
        store.add_record("ch2.txt", "en", "fr").await.unwrap();
    }

    let translator = Arc::new(MockTranslator::working());
    let manager = BatchManager::new(translator.clone());
    manager.initialize(dir.path(), None, None).unwrap();

    let mut receiver = manager.subscribe();
    manager
        .translate_files(params_for(&["ch1.txt", "ch2.txt", "ch3.txt"]))
        .unwrap();

    let events = collect_events_until_completed(&mut receiver).await;

    // A progress message for every file, recorded or not
    let progress = progress_messages(&events);
    assert_eq!(progress[0], "Translating file 1 of 3: ch1.txt");
    assert_eq!(progress[1], "Translating file 2 of 3: ch2.txt");
    assert_eq!(progress[2], "Translating file 3 of 3: ch3.txt");
    assert_eq!(
        progress[3],
        "Batch complete: 2 of 3 files translated successfully."
    );

    // Completions only for the files actually attempted
    assert_eq!(
        completed_files(&events),
        vec![("ch1.txt".to_string(), true), ("ch3.txt".to_string(), true)]
    );
    assert_eq!(completed_count(&events), 1);

    // The recorded file was never re-translated nor rewritten
    assert_eq!(translator.call_count(), 2);
    assert_eq!(common::read_file(dir.path(), "ch2.txt"), "dos");

    let outcome = manager.join_batch().await.unwrap();
    assert_eq!(outcome.state, BatchState::Completed);
    assert_eq!(outcome.succeeded, 2);
}

#[tokio::test(start_paused = true)]
async fn test_rerunAfterCompletion_shouldSkipEveryFile() {
    init_test_logging();
    let dir = common::create_working_dir(&[("ch1.txt", "uno"), ("ch2.txt", "dos")]);

    let translator = Arc::new(MockTranslator::working());
    let manager = BatchManager::new(translator.clone());
    manager.initialize(dir.path(), None, None).unwrap();

    let mut receiver = manager.subscribe();
    manager
        .translate_files(params_for(&["ch1.txt", "ch2.txt"]))
        .unwrap();
    collect_events_until_completed(&mut receiver).await;
    manager.join_batch().await.unwrap();

    assert_eq!(translator.call_count(), 2);

    // Second run over the same files: everything is recorded, nothing happens
    let mut receiver = manager.subscribe();
    manager
        .translate_files(params_for(&["ch1.txt", "ch2.txt"]))
        .unwrap();
    let events = collect_events_until_completed(&mut receiver).await;

    assert_eq!(translator.call_count(), 2);
    assert!(completed_files(&events).is_empty());
    assert_eq!(
        progress_messages(&events).last().unwrap().as_str(),
        "Batch complete: 0 of 2 files translated successfully."
    );
    assert_eq!(completed_count(&events), 1);
}

#[tokio::test(start_paused = true)]
async fn test_emptyTranslationForFirstFile_shouldErrorThenFailThatFileOnly() {
    init_test_logging();
    let dir = common::create_working_dir(&[("ch1.txt", "uno original"), ("ch2.txt", "dos")]);

    let translator = Arc::new(MockTranslator::empty_for("uno"));
    let manager = BatchManager::new(translator.clone());
    manager.initialize(dir.path(), None, None).unwrap();

    let mut receiver = manager.subscribe();
    manager
        .translate_files(params_for(&["ch1.txt", "ch2.txt"]))
        .unwrap();
    let events = collect_events_until_completed(&mut receiver).await;

    // The error precedes the failed completion for the same file
    let error_index = events
        .iter()
        .position(|event| matches!(event, BatchEvent::Error(message) if message.contains("no translation obtained")))
        .expect("missing empty-translation error");
    let completion_index = events
        .iter()
        .position(|event| {
            matches!(event, BatchEvent::FileCompleted { filename, success } if filename == "ch1.txt" && !success)
        })
        .expect("missing failed completion");
    assert!(error_index < completion_index);

    assert_eq!(
        completed_files(&events),
        vec![("ch1.txt".to_string(), false), ("ch2.txt".to_string(), true)]
    );

    // The failed file is untouched on disk and not recorded
    assert_eq!(common::read_file(dir.path(), "ch1.txt"), "uno original");
    let store = SqliteRecordStore::new(dir.path()).unwrap();
    assert!(!store.is_translated("ch1.txt").await.unwrap());
    assert!(store.is_translated("ch2.txt").await.unwrap());
    assert!(!common::has_temp_files(dir.path()));
}

#[tokio::test(start_paused = true)]
async fn test_stopAfterFirstFile_shouldSkipRestAndStillFinalize() {
    init_test_logging();
    let dir = common::create_working_dir(&[
        ("ch1.txt", "uno"),
        ("ch2.txt", "dos"),
        ("ch3.txt", "tres"),
    ]);

    let translator = Arc::new(MockTranslator::working());
    let manager = Arc::new(BatchManager::new(translator.clone()));
    manager.initialize(dir.path(), None, None).unwrap();

    let mut receiver = manager.subscribe();

    // The status callback runs synchronously right after the first
    // completion, before the worker reaches the next file
    let stopper = manager.clone();
    let params = params_for(&["ch1.txt", "ch2.txt", "ch3.txt"])
        .with_status_callback(Arc::new(move |_filename, _status| {
            stopper.stop_translation();
        }));

    manager.translate_files(params).unwrap();
    let events = collect_events_until_completed(&mut receiver).await;

    assert_eq!(completed_files(&events), vec![("ch1.txt".to_string(), true)]);
    assert_eq!(completed_count(&events), 1);
    assert_eq!(translator.call_count(), 1);

    // No final summary on the stop path
    assert!(
        !progress_messages(&events)
            .iter()
            .any(|message| message.starts_with("Batch complete"))
    );

    // Later files were never touched
    assert_eq!(common::read_file(dir.path(), "ch2.txt"), "dos");
    assert_eq!(common::read_file(dir.path(), "ch3.txt"), "tres");

    let outcome = manager.join_batch().await.unwrap();
    assert_eq!(outcome.state, BatchState::Stopped);
    assert_eq!(outcome.succeeded, 1);
}

#[tokio::test(start_paused = true)]
async fn test_statusCallback_shouldReceiveTranslatedAndErrorLabels() {
    init_test_logging();
    let dir = common::create_working_dir(&[("good.txt", "fine"), ("bad.txt", "break this")]);

    let translator = Arc::new(MockTranslator::failing_for("break"));
    let manager = BatchManager::new(translator);
    manager.initialize(dir.path(), None, None).unwrap();

    let statuses: Arc<parking_lot::Mutex<Vec<(String, String)>>> =
        Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = statuses.clone();

    let mut receiver = manager.subscribe();
    let params = params_for(&["good.txt", "bad.txt"]).with_status_callback(Arc::new(
        move |filename, status| {
            sink.lock().push((filename.to_string(), status.to_string()));
        },
    ));

    manager.translate_files(params).unwrap();
    collect_events_until_completed(&mut receiver).await;

    assert_eq!(
        *statuses.lock(),
        vec![
            ("good.txt".to_string(), "Translated".to_string()),
            ("bad.txt".to_string(), "Error".to_string()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_customTerms_shouldBeSavedAtBatchStartAndReachTranslator() {
    init_test_logging();
    let dir = common::create_working_dir(&[("ch1.txt", "uno")]);

    let translator = Arc::new(MockTranslator::working());
    let manager = BatchManager::new(translator.clone());
    manager.initialize(dir.path(), None, None).unwrap();

    let mut receiver = manager.subscribe();
    let params = params_for(&["ch1.txt"]).with_custom_terms("- wizard: mago");
    manager.translate_files(params).unwrap();
    collect_events_until_completed(&mut receiver).await;

    assert_eq!(manager.get_custom_terms().await.unwrap(), "- wizard: mago");

    let requests = translator.requests();
    assert_eq!(requests[0].custom_terms, "- wizard: mago");
}

#[tokio::test(start_paused = true)]
async fn test_failedFiles_shouldNotBeSkippedOnNextRun() {
    init_test_logging();
    let dir = common::create_working_dir(&[("ch1.txt", "break this")]);

    // First run fails the file, so no record is written
    let failing = Arc::new(MockTranslator::failing_for("break"));
    let manager = BatchManager::new(failing);
    manager.initialize(dir.path(), None, None).unwrap();

    let mut receiver = manager.subscribe();
    manager.translate_files(params_for(&["ch1.txt"])).unwrap();
    let events = collect_events_until_completed(&mut receiver).await;
    assert_eq!(completed_files(&events), vec![("ch1.txt".to_string(), false)]);
    manager.join_batch().await.unwrap();

    // A second run with a working backend picks the file up again
    let working = Arc::new(MockTranslator::working());
    let manager = BatchManager::new(working.clone());
    manager.initialize(dir.path(), None, None).unwrap();

    let mut receiver = manager.subscribe();
    manager.translate_files(params_for(&["ch1.txt"])).unwrap();
    let events = collect_events_until_completed(&mut receiver).await;

    assert_eq!(working.call_count(), 1);
    assert_eq!(completed_files(&events), vec![("ch1.txt".to_string(), true)]);
    assert!(error_messages(&events).is_empty());
}
