use crate::error::{CryptroomError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "ledger.json";
pub const DEFAULT_CHAIN_ID: u64 = 31337;
pub const DEFAULT_REVEAL_WINDOW_DAYS: u32 = 30;
pub const MAX_REVEAL_WINDOW_DAYS: u32 = 3650;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub contract_address: String,
    pub chain_id: u64,
    #[serde(default = "default_reveal_window_days")]
    pub reveal_window_days: u32,
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

fn default_reveal_window_days() -> u32 {
    DEFAULT_REVEAL_WINDOW_DAYS
}

fn default_database_file() -> String {
    "cryptroom.db".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            contract_address: format!("0x{}", "0".repeat(40)),
            chain_id: DEFAULT_CHAIN_ID,
            reveal_window_days: DEFAULT_REVEAL_WINDOW_DAYS,
            database_file: default_database_file(),
        }
    }
}

impl LedgerConfig {
    /// Defaults with a contract address derived from the data directory, so
    /// two local ledgers never share an address.
    pub fn for_data_dir(data_dir: &Path) -> Self {
        let digest = Sha256::digest(data_dir.to_string_lossy().as_bytes());
        Self {
            contract_address: format!("0x{}", hex::encode(&digest[..20])),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let address = self.contract_address.as_str();
        if !address.starts_with("0x") || address.len() <= 2 {
            return Err(CryptroomError::config(
                "Contract address must be a 0x-prefixed hex string",
            ));
        }

        if !address[2..].chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CryptroomError::config(format!(
                "Contract address contains non-hex characters: {}",
                address
            )));
        }

        if self.reveal_window_days == 0 {
            return Err(CryptroomError::config(
                "Reveal window must be at least one day",
            ));
        }

        if self.reveal_window_days > MAX_REVEAL_WINDOW_DAYS {
            return Err(CryptroomError::config(format!(
                "Reveal window cannot exceed {} days, got {}",
                MAX_REVEAL_WINDOW_DAYS, self.reveal_window_days
            )));
        }

        if self.database_file.trim().is_empty() {
            return Err(CryptroomError::config("Database file name cannot be empty"));
        }

        Ok(())
    }

    pub fn config_path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE_NAME)
    }

    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.database_file)
    }

    /// Read `ledger.json` from `data_dir`, writing defaults on first use.
    pub async fn load_or_init(data_dir: &Path) -> Result<Self> {
        let path = Self::config_path(data_dir);

        let config = if tokio::fs::try_exists(&path).await? {
            let content = tokio::fs::read_to_string(&path).await?;
            serde_json::from_str::<Self>(&content)?
        } else {
            let config = Self::for_data_dir(data_dir);
            config.save(data_dir).await?;
            tracing::info!("Wrote default ledger config to {}", path.display());
            config
        };

        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self, data_dir: &Path) -> Result<()> {
        self.validate()?;
        tokio::fs::create_dir_all(data_dir).await?;
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(Self::config_path(data_dir), content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_validate() {
        assert!(LedgerConfig::default().validate().is_ok());

        let mut config = LedgerConfig::default();
        config.contract_address = "1234".to_string();
        assert!(config.validate().is_err());

        let mut config = LedgerConfig::default();
        config.contract_address = "0xzz".to_string();
        assert!(config.validate().is_err());

        let mut config = LedgerConfig::default();
        config.reveal_window_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reveal_window_upper_bound() {
        let mut config = LedgerConfig::default();
        config.reveal_window_days = MAX_REVEAL_WINDOW_DAYS;
        assert!(config.validate().is_ok());

        config.reveal_window_days = 100_000_000;
        assert!(matches!(config.validate(), Err(CryptroomError::Config(_))));
    }

    #[tokio::test]
    async fn test_save_rejects_oversized_reveal_window() {
        let temp_dir = tempdir().unwrap();
        let mut config = LedgerConfig::load_or_init(temp_dir.path()).await.unwrap();

        config.reveal_window_days = u32::MAX;
        assert!(config.save(temp_dir.path()).await.is_err());

        let reloaded = LedgerConfig::load_or_init(temp_dir.path()).await.unwrap();
        assert_eq!(reloaded.reveal_window_days, DEFAULT_REVEAL_WINDOW_DAYS);
    }

    #[tokio::test]
    async fn test_load_or_init_persists_defaults() {
        let temp_dir = tempdir().unwrap();

        let first = LedgerConfig::load_or_init(temp_dir.path()).await.unwrap();
        assert_eq!(first.chain_id, DEFAULT_CHAIN_ID);
        assert_eq!(first.contract_address.len(), 42);
        assert!(LedgerConfig::config_path(temp_dir.path()).exists());

        let mut changed = first.clone();
        changed.chain_id = 11155111;
        changed.save(temp_dir.path()).await.unwrap();

        let second = LedgerConfig::load_or_init(temp_dir.path()).await.unwrap();
        assert_eq!(second, changed);
    }
}
