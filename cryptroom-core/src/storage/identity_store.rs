use crate::error::Result;
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityData {
    pub id: String,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub seed: Vec<u8>,
}

pub struct IdentityStore<'a> {
    storage: &'a Storage,
}

impl<'a> IdentityStore<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub async fn save_identity(&self, data: &IdentityData) -> Result<()> {
        let conn = self.storage.get_connection().await;

        conn.execute(
            "INSERT OR REPLACE INTO identities (id, name, address, created_at, seed)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                data.id,
                data.name,
                data.address,
                data.created_at.timestamp(),
                data.seed,
            ],
        )?;

        Ok(())
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<IdentityData>> {
        let conn = self.storage.get_connection().await;

        let data = conn
            .query_row(
                "SELECT id, name, address, created_at, seed FROM identities WHERE name = ?1",
                params![name],
                |row| {
                    Ok(IdentityData {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        address: row.get(2)?,
                        created_at: DateTime::from_timestamp(row.get(3)?, 0)
                            .unwrap_or_else(Utc::now),
                        seed: row.get(4)?,
                    })
                },
            )
            .optional()?;

        Ok(data)
    }

    pub async fn list_identities(&self) -> Result<Vec<IdentityData>> {
        let conn = self.storage.get_connection().await;

        let mut stmt = conn.prepare(
            "SELECT id, name, address, created_at, seed
             FROM identities ORDER BY created_at DESC, name ASC",
        )?;

        let identity_iter = stmt.query_map([], |row| {
            Ok(IdentityData {
                id: row.get(0)?,
                name: row.get(1)?,
                address: row.get(2)?,
                created_at: DateTime::from_timestamp(row.get(3)?, 0).unwrap_or_else(Utc::now),
                seed: row.get(4)?,
            })
        })?;

        let mut identities = Vec::new();
        for identity in identity_iter {
            identities.push(identity?);
        }

        Ok(identities)
    }

    pub async fn delete_identity(&self, id: &str) -> Result<()> {
        let conn = self.storage.get_connection().await;
        conn.execute("DELETE FROM identities WHERE id = ?1", params![id])?;
        Ok(())
    }

    pub async fn identity_exists(&self, name: &str) -> Result<bool> {
        let conn = self.storage.get_connection().await;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM identities WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }
}
