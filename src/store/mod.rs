/*!
 * Persistent record store for translated files and custom terms.
 *
 * A record store remembers which filenames in a working directory have
 * already been translated, so re-running a batch skips them, and keeps the
 * user's custom terminology glossary across batches. The SQLite-backed
 * implementation lives alongside the files it tracks, one database per
 * working directory.
 */

use anyhow::Result;
use async_trait::async_trait;

pub use self::connection::StoreConnection;
pub use self::models::TranslationRecord;
pub use self::sqlite::{RECORDS_DB_FILENAME, SqliteRecordStore};

pub mod connection;
pub mod models;
pub mod schema;
pub mod sqlite;

/// Persistent ledger of translated files, consumed by the batch orchestrator
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Whether a record exists for this filename.
    ///
    /// The skip predicate is by filename only: a file translated for any
    /// language pair counts as done, whatever pair the current batch uses.
    async fn is_translated(&self, filename: &str) -> Result<bool>;

    /// Record a completed translation for a filename
    async fn add_record(&self, filename: &str, source_lang: &str, target_lang: &str)
    -> Result<()>;

    /// Persist the custom terminology glossary
    async fn save_custom_terms(&self, terms: &str) -> Result<()>;

    /// Read the stored custom terminology glossary, empty if never saved
    async fn get_custom_terms(&self) -> Result<String>;

    /// List every stored translation record
    async fn list_records(&self) -> Result<Vec<TranslationRecord>>;

    /// Remove all translation records, returning how many were deleted
    async fn clear_records(&self) -> Result<u64>;
}
