use crate::error::Result;
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

/// Raw key-value row with its last writer.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub key: String,
    pub value: Vec<u8>,
    pub writer: String,
    pub updated_at: DateTime<Utc>,
}

pub struct EntryStore<'a> {
    storage: &'a Storage,
}

impl<'a> EntryStore<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let conn = self.storage.get_connection().await;

        let value = conn
            .query_row(
                "SELECT value FROM ledger_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value)
    }

    /// Last writer wins, there is no version check.
    pub async fn put(&self, key: &str, value: &[u8], writer: &str) -> Result<()> {
        let conn = self.storage.get_connection().await;

        conn.execute(
            "INSERT OR REPLACE INTO ledger_entries (key, value, writer, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![key, value, writer, Utc::now().timestamp()],
        )?;

        Ok(())
    }

    pub async fn entry(&self, key: &str) -> Result<Option<LedgerEntry>> {
        let conn = self.storage.get_connection().await;

        let entry = conn
            .query_row(
                "SELECT key, value, writer, updated_at FROM ledger_entries WHERE key = ?1",
                params![key],
                |row| {
                    Ok(LedgerEntry {
                        key: row.get(0)?,
                        value: row.get(1)?,
                        writer: row.get(2)?,
                        updated_at: DateTime::from_timestamp(row.get(3)?, 0)
                            .unwrap_or_else(Utc::now),
                    })
                },
            )
            .optional()?;

        Ok(entry)
    }
}
