//! Generic key-value contract store.
//!
//! Rooms live on a ledger that only offers `getData`/`setData`. Reads are
//! free, writes are signed by an [`Identity`]. Unknown keys read as empty
//! bytes, never as an error.

pub mod config;
pub mod memory;
pub mod sqlite;

pub use config::LedgerConfig;
pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;

use crate::error::Result;
use crate::identity::Identity;
use async_trait::async_trait;

/// Ledger key holding the JSON array of every room identifier.
pub const ROOM_INDEX_KEY: &str = "room_keys";

pub fn room_key(room_id: &str) -> String {
    format!("room_{}", room_id)
}

#[async_trait]
pub trait KeyValueLedger: Send + Sync {
    /// Whether the contract answers at all. Callers treat an unavailable
    /// ledger as empty.
    async fn is_available(&self) -> Result<bool>;

    fn contract_address(&self) -> &str;

    fn chain_id(&self) -> u64;

    /// Bytes stored under `key`, empty when the key was never written.
    async fn get_data(&self, key: &str) -> Result<Vec<u8>>;

    async fn set_data(&self, signer: &Identity, key: &str, value: &[u8]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_key() {
        assert_eq!(room_key("1700000000000-ab12cd3"), "room_1700000000000-ab12cd3");
    }
}
