use anyhow::Result;
use clap::Subcommand;
use cryptroom_core::LedgerConfig;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the ledger configuration
    Show,
    /// Set the contract address used in reveal messages
    SetContract {
        /// 0x-prefixed contract address
        address: String,
    },
    /// Set the chain id used in reveal messages
    SetChainId {
        chain_id: u64,
    },
    /// Set how many days a reveal session stays valid
    SetRevealWindow {
        days: u32,
    },
}

pub async fn handle_config_command(cmd: ConfigCommands, data_dir: &Path) -> Result<()> {
    let mut config = LedgerConfig::load_or_init(data_dir).await?;

    match cmd {
        ConfigCommands::Show => {
            println!("Ledger Configuration:");
            println!("  Contract address: {}", config.contract_address);
            println!("  Chain ID: {}", config.chain_id);
            println!("  Reveal window: {} days", config.reveal_window_days);
            println!("  Database: {}", config.database_path(data_dir).display());
            return Ok(());
        }
        ConfigCommands::SetContract { address } => {
            config.contract_address = address;
        }
        ConfigCommands::SetChainId { chain_id } => {
            config.chain_id = chain_id;
        }
        ConfigCommands::SetRevealWindow { days } => {
            config.reveal_window_days = days;
        }
    }

    config.save(data_dir).await?;
    println!("Configuration saved to {}", LedgerConfig::config_path(data_dir).display());

    Ok(())
}
