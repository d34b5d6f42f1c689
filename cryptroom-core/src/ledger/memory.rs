use crate::error::{CryptroomError, Result};
use crate::identity::Identity;
use crate::ledger::{KeyValueLedger, LedgerConfig};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-process ledger. Holds everything in a map and forgets it on drop.
pub struct MemoryLedger {
    config: LedgerConfig,
    entries: RwLock<HashMap<String, Vec<u8>>>,
    available: AtomicBool,
}

impl MemoryLedger {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Write without a signer, for seeding fixtures.
    pub fn insert_raw(&self, key: &str, value: &[u8]) {
        self.entries.write().insert(key.to_string(), value.to_vec());
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

#[async_trait]
impl KeyValueLedger for MemoryLedger {
    async fn is_available(&self) -> Result<bool> {
        Ok(self.available.load(Ordering::SeqCst))
    }

    fn contract_address(&self) -> &str {
        &self.config.contract_address
    }

    fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    async fn get_data(&self, key: &str) -> Result<Vec<u8>> {
        Ok(self.entries.read().get(key).cloned().unwrap_or_default())
    }

    async fn set_data(&self, signer: &Identity, key: &str, value: &[u8]) -> Result<()> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(CryptroomError::LedgerUnavailable);
        }

        self.entries.write().insert(key.to_string(), value.to_vec());
        tracing::debug!("{} wrote {} bytes to '{}'", signer.address(), value.len(), key);
        Ok(())
    }
}
