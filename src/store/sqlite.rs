/*!
 * SQLite-backed record store.
 *
 * The database lives inside the working directory it tracks, so moving a
 * directory keeps its translation history, and two directories never share
 * records. All operations go through `StoreConnection::execute_async` to
 * keep the async runtime unblocked.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use rusqlite::{OptionalExtension, params};
use std::path::Path;

use super::connection::StoreConnection;
use super::models::TranslationRecord;
use super::RecordStore;

/// Filename of the record database inside a working directory
pub const RECORDS_DB_FILENAME: &str = ".batrans_records.db";

/// Record store backed by a per-directory SQLite database
#[derive(Clone)]
pub struct SqliteRecordStore {
    /// Database connection
    db: StoreConnection,
}

impl SqliteRecordStore {
    /// Open (or create) the record store for a working directory
    pub fn new<P: AsRef<Path>>(working_dir: P) -> Result<Self> {
        let db_path = working_dir.as_ref().join(RECORDS_DB_FILENAME);
        let db = StoreConnection::new(db_path)?;
        Ok(Self { db })
    }

    /// Create a record store with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = StoreConnection::new_in_memory()?;
        Ok(Self { db })
    }

    /// The underlying connection
    pub fn connection(&self) -> &StoreConnection {
        &self.db
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn is_translated(&self, filename: &str) -> Result<bool> {
        let filename = filename.to_string();

        self.db
            .execute_async(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM translations WHERE filename = ?1",
                    [&filename],
                    |row| row.get(0),
                )?;
                Ok(count > 0)
            })
            .await
    }

    async fn add_record(
        &self,
        filename: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<()> {
        let record = TranslationRecord::new(filename, source_lang, target_lang);
        debug!("Recording translation of {}", record.filename);

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT OR REPLACE INTO translations (filename, source_lang, target_lang, translated_at)
                    VALUES (?1, ?2, ?3, ?4)
                    "#,
                    params![
                        record.filename,
                        record.source_lang,
                        record.target_lang,
                        record.translated_at,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    async fn save_custom_terms(&self, terms: &str) -> Result<()> {
        let terms = terms.to_string();
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO custom_terms (id, terms, updated_at)
                    VALUES (1, ?1, ?2)
                    ON CONFLICT(id) DO UPDATE SET
                        terms = excluded.terms,
                        updated_at = excluded.updated_at
                    "#,
                    params![terms, now],
                )?;
                Ok(())
            })
            .await
    }

    async fn get_custom_terms(&self) -> Result<String> {
        self.db
            .execute_async(|conn| {
                let terms: Option<String> = conn
                    .query_row(
                        "SELECT terms FROM custom_terms WHERE id = 1",
                        [],
                        |row| row.get(0),
                    )
                    .optional()?;

                Ok(terms.unwrap_or_default())
            })
            .await
    }

    async fn list_records(&self) -> Result<Vec<TranslationRecord>> {
        self.db
            .execute_async(|conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT filename, source_lang, target_lang, translated_at
                    FROM translations
                    ORDER BY filename
                    "#,
                )?;

                let rows = stmt.query_map([], |row| {
                    Ok(TranslationRecord {
                        filename: row.get(0)?,
                        source_lang: row.get(1)?,
                        target_lang: row.get(2)?,
                        translated_at: row.get(3)?,
                    })
                })?;

                let records: Vec<TranslationRecord> = rows.filter_map(|r| r.ok()).collect();
                Ok(records)
            })
            .await
    }

    async fn clear_records(&self) -> Result<u64> {
        self.db
            .execute_async(|conn| {
                let deleted = conn.execute("DELETE FROM translations", [])?;
                Ok(deleted as u64)
            })
            .await
    }
}
