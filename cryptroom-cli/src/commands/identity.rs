use anyhow::Result;
use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use cryptroom_core::{CryptroomError, IdentityManager};
use dialoguer::{Confirm, Password};

#[derive(Subcommand)]
pub enum IdentityCommands {
    /// Create a new signing identity
    Create {
        /// Identity name
        name: String,
    },
    /// Import an identity from mnemonic
    Import {
        /// Identity name
        name: String,
        /// Mnemonic phrase (will prompt if not provided)
        #[arg(short, long)]
        mnemonic: Option<String>,
    },
    /// List all identities
    List,
    /// Show identity information
    Info {
        /// Identity name
        name: String,
    },
    /// Delete an identity
    Delete {
        /// Identity name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn handle_identity_command(
    cmd: IdentityCommands,
    manager: &IdentityManager,
) -> Result<()> {
    match cmd {
        IdentityCommands::Create { name } => {
            println!("Creating identity '{}'...", name);
            let (identity, mnemonic) = manager.create_identity(&name).await?;

            println!("Identity created successfully!");
            println!();
            println!("IMPORTANT: Save your mnemonic phrase securely!");
            println!("Mnemonic: {}", mnemonic);
            println!();
            println!("Identity Details:");
            println!("  Name: {}", identity.name());
            println!("  ID: {}", identity.id());
            println!("  Address: {}", identity.address());
        }

        IdentityCommands::Import { name, mnemonic } => {
            let mnemonic = if let Some(m) = mnemonic {
                m
            } else {
                Password::new()
                    .with_prompt("Enter mnemonic phrase")
                    .interact()
                    .map_err(CryptroomError::from)?
            };

            println!("Importing identity '{}'...", name);
            let identity = manager.import_identity(&name, &mnemonic).await?;

            println!("Identity imported successfully!");
            println!("  Name: {}", identity.name());
            println!("  ID: {}", identity.id());
            println!("  Address: {}", identity.address());
        }

        IdentityCommands::List => {
            let identities = manager.list_identities().await?;

            if identities.is_empty() {
                println!("No identities found.");
                println!("Create a new identity with: cryptroom identity create <name>");
                return Ok(());
            }

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Name", "Address", "Created"]);

            for identity in identities {
                table.add_row(vec![
                    identity.name,
                    identity.address,
                    identity.created_at.format("%Y-%m-%d %H:%M").to_string(),
                ]);
            }

            println!("{}", table);
        }

        IdentityCommands::Info { name } => {
            let identity = manager.load_identity(&name).await?;

            println!("Identity Information:");
            println!("  Name: {}", identity.name());
            println!("  ID: {}", identity.id());
            println!("  Address: {}", identity.address());
            println!("  Public key: {}", identity.public_key_hex());
        }

        IdentityCommands::Delete { name, force } => {
            if !force {
                let confirm = Confirm::new()
                    .with_prompt(format!(
                        "Are you sure you want to delete identity '{}'? This action cannot be undone.",
                        name
                    ))
                    .default(false)
                    .interact()
                    .map_err(CryptroomError::from)?;

                if !confirm {
                    println!("Deletion cancelled.");
                    return Ok(());
                }
            }

            manager.delete_identity(&name).await?;
            println!("Identity '{}' deleted successfully.", name);
        }
    }

    Ok(())
}
