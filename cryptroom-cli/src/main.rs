mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::CliConfig;
use cryptroom_core::{CryptroomError, StatusBanner, Workspace};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cryptroom")]
#[command(about = "CryptRoom - puzzle rooms on a key-value ledger")]
#[command(version)]
struct Cli {
    /// Data directory for identities and the local ledger
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Signing identity commands
    #[command(subcommand)]
    Identity(commands::IdentityCommands),

    /// Room commands
    #[command(subcommand)]
    Room(commands::RoomCommands),

    /// Ledger configuration commands
    #[command(subcommand)]
    Config(commands::ConfigCommands),
}

async fn run(command: Commands, data_dir: &Path) -> anyhow::Result<()> {
    match command {
        Commands::Identity(cmd) => {
            let workspace = Workspace::open(data_dir).await?;
            commands::handle_identity_command(cmd, &workspace.identities).await
        }
        Commands::Room(cmd) => {
            let workspace = Workspace::open(data_dir).await?;
            commands::handle_room_command(cmd, &workspace).await
        }
        Commands::Config(cmd) => commands::handle_config_command(cmd, data_dir).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::from_args(cli.data_dir, cli.verbose);

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_filter()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Ensure data directory exists
    tokio::fs::create_dir_all(&config.data_dir).await?;

    let result = run(cli.command, &config.data_dir).await;

    if let Err(e) = result {
        eprintln!("{}", StatusBanner::error(e.to_string()));
        match e.downcast_ref::<CryptroomError>() {
            Some(CryptroomError::IdentityNotFound { .. }) => {
                eprintln!("Use 'cryptroom identity list' to see available identities");
            }
            Some(CryptroomError::RoomNotFound { .. }) => {
                eprintln!("Use 'cryptroom room list' to see available rooms");
            }
            Some(CryptroomError::NotCreator { .. }) => {
                eprintln!("Only the room creator can reveal its solution");
            }
            _ => {}
        }
        std::process::exit(1);
    }

    Ok(())
}
