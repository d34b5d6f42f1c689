use crate::error::{CryptroomError, Result};
use crate::identity::{generate_mnemonic, mnemonic_to_keypair, Identity};
use crate::storage::identity_store::IdentityData;
use crate::storage::{IdentityStore, Storage};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub struct IdentityManager {
    storage: Arc<Storage>,
    identities: Arc<RwLock<HashMap<String, Arc<Identity>>>>,
}

impl IdentityManager {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self {
            storage,
            identities: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create an identity from a fresh mnemonic. The mnemonic is returned
    /// so the caller can show it once.
    pub async fn create_identity(&self, name: &str) -> Result<(Arc<Identity>, String)> {
        let mnemonic = generate_mnemonic()?;
        let identity = self.register(name, &mnemonic).await?;

        tracing::info!("Created identity '{}' ({})", name, identity.address());
        Ok((identity, mnemonic))
    }

    pub async fn import_identity(&self, name: &str, mnemonic: &str) -> Result<Arc<Identity>> {
        let identity = self.register(name, mnemonic.trim()).await?;

        tracing::info!("Imported identity '{}' ({})", name, identity.address());
        Ok(identity)
    }

    async fn register(&self, name: &str, mnemonic: &str) -> Result<Arc<Identity>> {
        if name.trim().is_empty() {
            return Err(CryptroomError::identity("Identity name cannot be empty"));
        }

        let identity_store = IdentityStore::new(&self.storage);
        if identity_store.identity_exists(name).await? {
            return Err(CryptroomError::identity(format!(
                "Identity '{}' already exists",
                name
            )));
        }

        let keypair = mnemonic_to_keypair(mnemonic)?;
        let identity_id = Uuid::new_v4().to_string();
        let identity = Arc::new(Identity::new(
            identity_id.clone(),
            name.to_string(),
            keypair,
        ));

        let data = IdentityData {
            id: identity_id.clone(),
            name: name.to_string(),
            address: identity.address().to_string(),
            created_at: Utc::now(),
            seed: mnemonic.as_bytes().to_vec(),
        };
        identity_store.save_identity(&data).await?;

        {
            let mut identities = self.identities.write();
            identities.insert(identity_id, identity.clone());
        }

        Ok(identity)
    }

    pub async fn load_identity(&self, name: &str) -> Result<Arc<Identity>> {
        // Check cache first
        {
            let identities = self.identities.read();
            if let Some(identity) = identities.values().find(|i| i.name() == name) {
                return Ok(identity.clone());
            }
        }

        let identity_store = IdentityStore::new(&self.storage);
        let data = identity_store
            .find_by_name(name)
            .await?
            .ok_or_else(|| CryptroomError::IdentityNotFound {
                name: name.to_string(),
            })?;

        let mnemonic = String::from_utf8(data.seed)
            .map_err(|e| CryptroomError::internal(format!("Stored seed is corrupt: {}", e)))?;
        let keypair = mnemonic_to_keypair(&mnemonic)?;
        let identity = Arc::new(Identity::new(data.id.clone(), data.name, keypair));

        {
            let mut identities = self.identities.write();
            identities.insert(data.id, identity.clone());
        }

        Ok(identity)
    }

    pub async fn list_identities(&self) -> Result<Vec<IdentityData>> {
        let identity_store = IdentityStore::new(&self.storage);
        let mut identities = identity_store.list_identities().await?;
        for data in identities.iter_mut() {
            // Never hand the seed out through listings
            data.seed.clear();
        }
        Ok(identities)
    }

    pub async fn delete_identity(&self, name: &str) -> Result<()> {
        let identity_store = IdentityStore::new(&self.storage);
        let data = identity_store
            .find_by_name(name)
            .await?
            .ok_or_else(|| CryptroomError::IdentityNotFound {
                name: name.to_string(),
            })?;

        {
            let mut identities = self.identities.write();
            identities.remove(&data.id);
        }

        identity_store.delete_identity(&data.id).await?;

        tracing::info!("Deleted identity '{}'", name);
        Ok(())
    }
}
