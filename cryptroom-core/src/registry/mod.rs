//! Room registry on top of a [`KeyValueLedger`].
//!
//! Layout on the ledger:
//! - `room_keys` holds a JSON array with every room id, in creation order.
//! - `room_{id}` holds the JSON [`RoomRecord`] for one room.
//!
//! Every write is a plain read-modify-write. Two clients bumping the same
//! counter at once can lose an increment, and a create whose index write
//! fails leaves an orphaned record behind. Neither is repaired.

pub mod filter;
pub mod stats;

pub use filter::{RoomFilter, TagFilter, KNOWN_TAGS};
pub use stats::RoomStats;

use crate::error::{CryptroomError, Result};
use crate::identity::Identity;
use crate::ledger::{room_key, KeyValueLedger, ROOM_INDEX_KEY};
use crate::obfuscation::obfuscate;
use crate::types::{NewRoom, Room, RoomRecord};
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;

const ROOM_ID_SUFFIX_LEN: usize = 7;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomCounter {
    Likes,
    Plays,
}

pub struct RoomRegistry {
    ledger: Arc<dyn KeyValueLedger>,
}

impl RoomRegistry {
    pub fn new(ledger: Arc<dyn KeyValueLedger>) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Arc<dyn KeyValueLedger> {
        &self.ledger
    }

    /// Read every indexed room, newest first.
    ///
    /// Ids without a record, or whose record does not parse, are skipped.
    /// An unavailable ledger yields an empty list.
    pub async fn load_rooms(&self) -> Result<Vec<Room>> {
        if !self.ledger.is_available().await? {
            tracing::warn!("Ledger {} is not available", self.ledger.contract_address());
            return Ok(Vec::new());
        }

        let ids = self.read_index().await?;
        let mut rooms = Vec::with_capacity(ids.len());

        for id in ids {
            let bytes = match self.ledger.get_data(&room_key(&id)).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!("Error loading room {}: {}", id, e);
                    continue;
                }
            };

            if bytes.is_empty() {
                tracing::warn!("Room {} is indexed but has no record", id);
                continue;
            }

            match RoomRecord::from_bytes(&bytes) {
                Ok(record) => rooms.push(Room::from_record(id, record)),
                Err(e) => tracing::error!("Error parsing room data for {}: {}", id, e),
            }
        }

        rooms.sort_by(|a, b| b.creation_date.cmp(&a.creation_date));
        Ok(rooms)
    }

    pub async fn get_room(&self, room_id: &str) -> Result<Room> {
        let record = self.read_record(room_id).await?;
        Ok(Room::from_record(room_id, record))
    }

    /// Store a new room and append it to the index. Returns the room and the
    /// refreshed list.
    pub async fn create_room(
        &self,
        creator: &Identity,
        new_room: NewRoom,
    ) -> Result<(Room, Vec<Room>)> {
        new_room.validate()?;

        let solution = obfuscate(new_room.solution)?;
        let now = Utc::now();
        let room_id = generate_room_id(now.timestamp_millis());

        let record = RoomRecord {
            name: new_room.name,
            creator: creator.address().to_string(),
            difficulty: new_room.difficulty,
            solution,
            creation_date: now.timestamp(),
            likes: 0,
            plays: 0,
            tags: new_room.tags,
            extra: serde_json::Map::new(),
        };

        self.ledger
            .set_data(creator, &room_key(&room_id), &record.to_bytes()?)
            .await?;

        // Re-read the index right before appending so the window for
        // clobbering another client's append stays small.
        let mut ids = self.read_index().await?;
        ids.push(room_id.clone());
        self.ledger
            .set_data(creator, ROOM_INDEX_KEY, &serde_json::to_vec(&ids)?)
            .await?;

        tracing::info!(
            "{} created room '{}' ({})",
            creator.address(),
            record.name,
            room_id
        );

        let room = Room::from_record(room_id, record);
        let rooms = self.load_rooms().await?;
        Ok((room, rooms))
    }

    pub async fn like_room(&self, identity: &Identity, room_id: &str) -> Result<Vec<Room>> {
        self.increment(identity, room_id, RoomCounter::Likes).await?;
        self.load_rooms().await
    }

    pub async fn play_room(&self, identity: &Identity, room_id: &str) -> Result<Vec<Room>> {
        self.increment(identity, room_id, RoomCounter::Plays).await?;
        self.load_rooms().await
    }

    /// Bump one counter and write the record back. Returns the updated room.
    pub async fn increment(
        &self,
        identity: &Identity,
        room_id: &str,
        counter: RoomCounter,
    ) -> Result<Room> {
        let mut record = self.read_record(room_id).await?;

        match counter {
            RoomCounter::Likes => record.likes = record.likes.saturating_add(1),
            RoomCounter::Plays => record.plays = record.plays.saturating_add(1),
        }

        self.ledger
            .set_data(identity, &room_key(room_id), &record.to_bytes()?)
            .await?;

        tracing::info!("{} bumped {:?} on room {}", identity.address(), counter, room_id);
        Ok(Room::from_record(room_id, record))
    }

    async fn read_record(&self, room_id: &str) -> Result<RoomRecord> {
        let bytes = self.ledger.get_data(&room_key(room_id)).await?;
        if bytes.is_empty() {
            return Err(CryptroomError::RoomNotFound {
                id: room_id.to_string(),
            });
        }

        RoomRecord::from_bytes(&bytes)
    }

    /// Missing, blank or malformed index reads as empty.
    async fn read_index(&self) -> Result<Vec<String>> {
        let bytes = self.ledger.get_data(ROOM_INDEX_KEY).await?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }

        let text = match std::str::from_utf8(&bytes) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => return Ok(Vec::new()),
            Err(e) => {
                tracing::error!("Error parsing room keys: {}", e);
                return Ok(Vec::new());
            }
        };

        match serde_json::from_str::<Vec<String>>(text) {
            Ok(ids) => Ok(ids),
            Err(e) => {
                tracing::error!("Error parsing room keys: {}", e);
                Ok(Vec::new())
            }
        }
    }
}

/// `{unix_millis}-{7 base36 chars}`
pub fn generate_room_id(timestamp_millis: i64) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ROOM_ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{}-{}", timestamp_millis, suffix)
}
