//! CryptRoom SDK - puzzle rooms stored on a generic key-value ledger
//!
//! Rooms are JSON records addressed through a shared id index. Solutions
//! are only obfuscated, never encrypted; see [`obfuscation`].

pub mod display;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod obfuscation;
pub mod registry;
pub mod reveal;
pub mod status;
pub mod storage;
pub mod types;

pub use error::{CryptroomError, Result};
pub use identity::{Identity, IdentityManager};
pub use ledger::{KeyValueLedger, LedgerConfig, MemoryLedger, SqliteLedger};
pub use registry::{RoomFilter, RoomRegistry, RoomStats, TagFilter};
pub use reveal::{RevealSession, RevealedSolution};
pub use status::{StatusBanner, TransactionStatus};
pub use types::{NewRoom, Room, RoomRecord};

use std::path::Path;
use std::sync::Arc;
use storage::Storage;

/// Everything a client needs, opened from one data directory.
pub struct Workspace {
    pub config: LedgerConfig,
    pub identities: IdentityManager,
    pub registry: RoomRegistry,
}

impl Workspace {
    pub async fn open(data_dir: &Path) -> Result<Self> {
        let config = LedgerConfig::load_or_init(data_dir).await?;
        let storage = Arc::new(Storage::new(&config.database_path(data_dir)).await?);

        let ledger = Arc::new(SqliteLedger::new(config.clone(), storage.clone()));
        Ok(Self {
            identities: IdentityManager::new(storage),
            registry: RoomRegistry::new(ledger),
            config,
        })
    }

    pub fn reveal_session(&self) -> RevealSession {
        RevealSession::for_ledger(self.registry.ledger().as_ref(), self.config.reveal_window_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_create_like_play_reveal() {
        let temp_dir = tempdir().unwrap();
        let workspace = Workspace::open(temp_dir.path()).await.unwrap();

        let (alice, _mnemonic) = workspace.identities.create_identity("alice").await.unwrap();
        let (bob, _mnemonic) = workspace.identities.create_identity("bob").await.unwrap();

        let (room, _) = workspace
            .registry
            .create_room(&alice, NewRoom::new("Escape the Lab", 2, 1337.0, "Puzzle"))
            .await
            .unwrap();

        workspace.registry.like_room(&bob, &room.id).await.unwrap();
        let rooms = workspace.registry.play_room(&bob, &room.id).await.unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!((rooms[0].likes, rooms[0].plays), (1, 1));

        let session = workspace.reveal_session();
        assert_eq!(session.contract_address, workspace.config.contract_address);

        let revealed = session.reveal(&alice, &rooms[0], |_| Ok(true)).unwrap();
        assert_eq!(revealed.value, 1337.0);
        assert!(session.reveal(&bob, &rooms[0], |_| Ok(true)).is_err());

        // Reopening sees the same rooms
        drop(workspace);
        let reopened = Workspace::open(temp_dir.path()).await.unwrap();
        assert_eq!(reopened.registry.load_rooms().await.unwrap(), rooms);
    }
}
