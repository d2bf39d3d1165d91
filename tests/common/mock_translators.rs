/*!
 * Mock translator and record store implementations for testing.
 *
 * The mock translator simulates different backend behaviors:
 * - `MockTranslator::working()` - Always succeeds with translated text
 * - `MockTranslator::empty()` - Returns an empty translation
 * - `MockTranslator::failing()` - Always fails with a provider error
 * - `MockTranslator::empty_for(needle)` - Empty output for matching texts only
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;

use batrans::errors::ProviderError;
use batrans::language_utils;
use batrans::store::{RecordStore, TranslationRecord};
use batrans::translation::{TranslateRequest, Translator};

/// Behavior mode for the mock translator
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always succeeds with a tagged translation
    Working,
    /// Always returns an empty translation
    Empty,
    /// Always fails with a provider error
    Failing,
    /// Returns an empty translation when the source text contains the needle
    EmptyFor(String),
    /// Fails with a provider error when the source text contains the needle
    FailingFor(String),
}

/// Mock translator for exercising batch behavior
#[derive(Clone)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of translate calls, shared across clones
    call_count: Arc<AtomicUsize>,
    /// Every request seen, shared across clones
    requests: Arc<Mutex<Vec<TranslateRequest>>>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock translator that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock translator that returns empty output
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a failing mock translator that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty output for texts containing the needle
    pub fn empty_for(needle: impl Into<String>) -> Self {
        Self::new(MockBehavior::EmptyFor(needle.into()))
    }

    /// Create a mock that fails for texts containing the needle
    pub fn failing_for(needle: impl Into<String>) -> Self {
        Self::new(MockBehavior::FailingFor(needle.into()))
    }

    /// The expected output for a given source text
    pub fn expected_output(target_lang: &str, text: &str) -> String {
        format!("[{}] {}", target_lang, text)
    }

    /// Number of translate calls so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every request seen so far
    pub fn requests(&self) -> Vec<TranslateRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, request: TranslateRequest) -> Result<String, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        match &self.behavior {
            MockBehavior::Working => Ok(Self::expected_output(&request.target_lang, &request.text)),

            MockBehavior::Empty => Ok(String::new()),

            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),

            MockBehavior::EmptyFor(needle) => {
                if request.text.contains(needle) {
                    Ok(String::new())
                } else {
                    Ok(Self::expected_output(&request.target_lang, &request.text))
                }
            }

            MockBehavior::FailingFor(needle) => {
                if request.text.contains(needle) {
                    Err(ProviderError::ApiError {
                        status_code: 503,
                        message: "Simulated provider failure".to_string(),
                    })
                } else {
                    Ok(Self::expected_output(&request.target_lang, &request.text))
                }
            }
        }
    }

    fn supported_languages(&self) -> BTreeMap<String, String> {
        language_utils::supported_languages()
    }
}

/// Record store whose every operation fails, for batch-level error paths
pub struct FailingRecordStore;

#[async_trait]
impl RecordStore for FailingRecordStore {
    async fn is_translated(&self, _filename: &str) -> Result<bool> {
        Err(anyhow::anyhow!("simulated store failure"))
    }

    async fn add_record(
        &self,
        _filename: &str,
        _source_lang: &str,
        _target_lang: &str,
    ) -> Result<()> {
        Err(anyhow::anyhow!("simulated store failure"))
    }

    async fn save_custom_terms(&self, _terms: &str) -> Result<()> {
        Err(anyhow::anyhow!("simulated store failure"))
    }

    async fn get_custom_terms(&self) -> Result<String> {
        Err(anyhow::anyhow!("simulated store failure"))
    }

    async fn list_records(&self) -> Result<Vec<TranslationRecord>> {
        Err(anyhow::anyhow!("simulated store failure"))
    }

    async fn clear_records(&self) -> Result<u64> {
        Err(anyhow::anyhow!("simulated store failure"))
    }
}
