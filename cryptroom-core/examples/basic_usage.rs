use cryptroom_core::{NewRoom, RoomFilter, RoomStats, TagFilter, Workspace};
use tempfile::tempdir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Create temp dir
    let temp_dir = tempdir()?;
    println!("Using temporary directory: {:?}", temp_dir.path());

    let workspace = Workspace::open(temp_dir.path()).await?;

    println!("Creating identity...");
    let (alice, mnemonic) = workspace.identities.create_identity("alice").await?;
    println!("Mnemonic: {}", mnemonic);
    println!("Address: {}", alice.address());

    let (room, _) = workspace
        .registry
        .create_room(&alice, NewRoom::new("Prime Vault", 4, 7919.0, "Math, Puzzle"))
        .await?;
    println!("\nCreated room {} with solution {}", room.id, room.encrypted_solution);

    workspace.registry.like_room(&alice, &room.id).await?;
    let rooms = workspace.registry.play_room(&alice, &room.id).await?;

    let filter = RoomFilter::new("vault", TagFilter::Tag("Math".to_string()));
    println!("\nMatching rooms: {}", filter.apply(&rooms).len());

    let stats = RoomStats::from_rooms(&rooms);
    println!(
        "Rooms: {}, likes: {}, plays: {}, avg difficulty: {}",
        stats.total_rooms,
        stats.total_likes,
        stats.total_plays,
        stats.average_difficulty_display()
    );

    let revealed = workspace
        .reveal_session()
        .reveal(&alice, &rooms[0], |_| Ok(true))?;
    println!("\nRevealed solution: {}", revealed.value);

    Ok(())
}
