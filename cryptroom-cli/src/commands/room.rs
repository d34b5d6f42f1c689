use anyhow::Result;
use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use cryptroom_core::display::{created_date, difficulty_stars, short_address};
use cryptroom_core::obfuscation::{obfuscate, preview};
use cryptroom_core::registry::KNOWN_TAGS;
use cryptroom_core::status::{creation_failed, like_failed, play_failed};
use cryptroom_core::{
    CryptroomError, NewRoom, Room, RoomFilter, RoomStats, StatusBanner, TagFilter, Workspace,
};
use dialoguer::Confirm;

#[derive(Subcommand)]
pub enum RoomCommands {
    /// List rooms, newest first
    List {
        /// Only rooms whose name contains this text
        #[arg(short, long, default_value = "")]
        search: String,
        /// Only rooms carrying this tag ("All" for every room)
        #[arg(short, long, default_value = "All")]
        tag: TagFilter,
    },
    /// Show a single room
    Show {
        /// Room ID
        id: String,
        /// Print the room as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new room
    Create {
        /// Identity that signs the write
        identity: String,
        /// Room name
        #[arg(short, long)]
        name: String,
        /// Difficulty from 1 to 5
        #[arg(long, default_value_t = 3)]
        difficulty: u8,
        /// Numeric solution
        #[arg(short, long, allow_hyphen_values = true)]
        solution: f64,
        /// Comma separated tags, e.g. "Puzzle, Math"
        #[arg(short, long, default_value = "")]
        tags: String,
    },
    /// Like a room
    Like {
        /// Identity that signs the write
        identity: String,
        /// Room ID
        id: String,
    },
    /// Record a play of a room
    Play {
        /// Identity that signs the write
        identity: String,
        /// Room ID
        id: String,
    },
    /// Reveal a room's solution (creator only)
    Reveal {
        /// Identity of the room creator
        identity: String,
        /// Room ID
        id: String,
        /// Sign without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Community statistics
    Stats,
    /// Tags offered for filtering
    Tags,
}

pub async fn handle_room_command(cmd: RoomCommands, workspace: &Workspace) -> Result<()> {
    let registry = &workspace.registry;

    match cmd {
        RoomCommands::List { search, tag } => {
            let rooms = registry.load_rooms().await?;
            let filter = RoomFilter::new(search, tag);
            let shown = filter.apply(&rooms);
            tracing::debug!("{} of {} rooms match", shown.len(), rooms.len());

            if shown.is_empty() {
                println!("No rooms found matching your criteria.");
                println!("Create one with: cryptroom room create <identity> --name <name> --solution <n>");
                return Ok(());
            }

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["ID", "Name", "Creator", "Difficulty", "Tags", "Likes", "Plays"]);

            for room in shown {
                table.add_row(vec![
                    room.id.clone(),
                    room.name.clone(),
                    short_address(&room.creator),
                    difficulty_stars(room.difficulty),
                    room.tags.join(", "),
                    room.likes.to_string(),
                    room.plays.to_string(),
                ]);
            }

            println!("{}", table);
        }

        RoomCommands::Show { id, json } => {
            let room = registry.get_room(&id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&room)?);
            } else {
                print_room(&room);
            }
        }

        RoomCommands::Create {
            identity,
            name,
            difficulty,
            solution,
            tags,
        } => {
            let identity = workspace.identities.load_identity(&identity).await?;
            let new_room = NewRoom::new(name, difficulty, solution, &tags);

            if let Ok(encoded) = obfuscate(new_room.solution) {
                println!("Encoded solution: {}", preview(&encoded, 30));
            }
            println!("{}", StatusBanner::pending("Encoding solution and writing room..."));

            let (room, rooms) = registry
                .create_room(&identity, new_room)
                .await
                .map_err(|e| with_banner(e, creation_failed))?;

            println!("{}", StatusBanner::success("Escape room created!"));
            println!("  ID: {}", room.id);
            println!("  Rooms on ledger: {}", rooms.len());
        }

        RoomCommands::Like { identity, id } => {
            let identity = workspace.identities.load_identity(&identity).await?;
            println!("{}", StatusBanner::pending("Updating room data..."));

            let rooms = registry
                .like_room(&identity, &id)
                .await
                .map_err(|e| with_banner(e, like_failed))?;

            println!("{}", StatusBanner::success("Room liked!"));
            print_counters(&rooms, &id);
        }

        RoomCommands::Play { identity, id } => {
            let identity = workspace.identities.load_identity(&identity).await?;
            println!("{}", StatusBanner::pending("Updating play count..."));

            let rooms = registry
                .play_room(&identity, &id)
                .await
                .map_err(|e| with_banner(e, play_failed))?;

            println!("{}", StatusBanner::success("Play count updated!"));
            print_counters(&rooms, &id);
        }

        RoomCommands::Reveal { identity, id, yes } => {
            let identity = workspace.identities.load_identity(&identity).await?;
            let room = registry.get_room(&id).await?;
            let session = workspace.reveal_session();

            let revealed = session.reveal(&identity, &room, |message| {
                if yes {
                    return Ok(true);
                }
                println!("Signature request:\n{}\n", preview_message(message));
                Ok(Confirm::new()
                    .with_prompt(format!("Sign as {}?", identity.address()))
                    .default(false)
                    .interact()?)
            })?;

            println!("Solution: {}", revealed.value);
            println!("Signature: {}", revealed.signature);
        }

        RoomCommands::Stats => {
            let rooms = registry.load_rooms().await?;
            let stats = RoomStats::from_rooms(&rooms);

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Total Rooms", "Total Plays", "Total Likes", "Avg Difficulty"]);
            table.add_row(vec![
                stats.total_rooms.to_string(),
                stats.total_plays.to_string(),
                stats.total_likes.to_string(),
                stats.average_difficulty_display(),
            ]);

            println!("{}", table);
        }

        RoomCommands::Tags => {
            for tag in KNOWN_TAGS {
                println!("{}", tag);
            }
        }
    }

    Ok(())
}

/// Attach the banner text for a failed write so `main` prints it.
fn with_banner(err: CryptroomError, message: fn(&CryptroomError) -> String) -> anyhow::Error {
    let banner = message(&err);
    anyhow::Error::new(err).context(banner)
}

fn print_room(room: &Room) {
    println!("{}", room.name);
    println!("  ID: {}", room.id);
    println!("  Creator: {}", short_address(&room.creator));
    println!("  Created: {}", created_date(room));
    println!("  Difficulty: {}", difficulty_stars(room.difficulty));
    println!("  Tags: {}", room.tags.join(", "));
    println!("  Likes: {}  Plays: {}", room.likes, room.plays);
    println!("  Encoded solution: {}", preview(&room.encrypted_solution, 50));
}

fn print_counters(rooms: &[Room], id: &str) {
    match rooms.iter().find(|room| room.id == id) {
        Some(room) => println!("  Likes: {}  Plays: {}", room.likes, room.plays),
        None => println!("  Room {} is not listed in the index", id),
    }
}

/// The session public key is 2000 hex digits; shorten it for the prompt.
fn preview_message(message: &str) -> String {
    message
        .lines()
        .map(|line| match line.strip_prefix("publickey:") {
            Some(key) => format!("publickey:{}", preview(key, 18)),
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
