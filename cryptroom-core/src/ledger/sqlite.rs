use crate::error::Result;
use crate::identity::Identity;
use crate::ledger::{KeyValueLedger, LedgerConfig};
use crate::storage::{EntryStore, Storage};
use async_trait::async_trait;
use std::sync::Arc;

/// Ledger persisted in the local SQLite database.
pub struct SqliteLedger {
    config: LedgerConfig,
    storage: Arc<Storage>,
}

impl SqliteLedger {
    pub fn new(config: LedgerConfig, storage: Arc<Storage>) -> Self {
        Self { config, storage }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Address that last wrote `key`, if any.
    pub async fn last_writer(&self, key: &str) -> Result<Option<String>> {
        let entry_store = EntryStore::new(&self.storage);
        Ok(entry_store.entry(key).await?.map(|entry| entry.writer))
    }
}

#[async_trait]
impl KeyValueLedger for SqliteLedger {
    async fn is_available(&self) -> Result<bool> {
        let conn = self.storage.get_connection().await;
        let ok: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(ok == 1)
    }

    fn contract_address(&self) -> &str {
        &self.config.contract_address
    }

    fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    async fn get_data(&self, key: &str) -> Result<Vec<u8>> {
        let entry_store = EntryStore::new(&self.storage);
        Ok(entry_store.get(key).await?.unwrap_or_default())
    }

    async fn set_data(&self, signer: &Identity, key: &str, value: &[u8]) -> Result<()> {
        let entry_store = EntryStore::new(&self.storage);
        entry_store.put(key, value, signer.address()).await?;

        tracing::debug!("{} wrote {} bytes to '{}'", signer.address(), value.len(), key);
        Ok(())
    }
}
