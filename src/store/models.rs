/*!
 * Record store entity models.
 *
 * These structures map directly to record database tables and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};

/// A completed translation, keyed by filename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Name of the file within the working directory
    pub filename: String,
    /// Source language code
    pub source_lang: String,
    /// Target language code
    pub target_lang: String,
    /// Completion timestamp (ISO 8601)
    pub translated_at: String,
}

impl TranslationRecord {
    /// Create a new record stamped with the current time
    pub fn new(
        filename: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            translated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
