use crate::error::{CryptroomError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 5;

/// Room as stored on the ledger under `room_{id}`.
///
/// Field names follow the JSON written by the web client, so records created
/// there and here are interchangeable. Fields this crate does not know about
/// are kept in `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    pub name: String,
    pub creator: String,
    pub difficulty: u8,
    pub solution: String,
    pub creation_date: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plays: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl RoomRecord {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| CryptroomError::ledger(format!("Room record is not UTF-8: {}", e)))?;
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// A room as shown to players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub creator: String,
    pub difficulty: u8,
    pub encrypted_solution: String,
    pub creation_date: i64,
    pub likes: u64,
    pub plays: u64,
    pub tags: Vec<String>,
}

impl Room {
    pub fn from_record(id: impl Into<String>, record: RoomRecord) -> Self {
        Self {
            id: id.into(),
            name: record.name,
            creator: record.creator,
            difficulty: record.difficulty,
            encrypted_solution: record.solution,
            creation_date: record.creation_date,
            likes: record.likes,
            plays: record.plays,
            tags: record.tags,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.creation_date, 0).unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Addresses are compared case-insensitively.
    pub fn is_creator(&self, address: &str) -> bool {
        self.creator.eq_ignore_ascii_case(address)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Input for creating a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRoom {
    pub name: String,
    pub difficulty: u8,
    pub solution: f64,
    pub tags: Vec<String>,
}

impl NewRoom {
    /// `tags` is the raw comma separated input, e.g. `"Puzzle, Math"`.
    pub fn new(name: impl Into<String>, difficulty: u8, solution: f64, tags: &str) -> Self {
        Self {
            name: name.into(),
            difficulty,
            solution,
            tags: parse_tags(tags),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CryptroomError::invalid_room("Room name cannot be empty"));
        }

        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(CryptroomError::invalid_room(format!(
                "Difficulty must be between {} and {}, got {}",
                MIN_DIFFICULTY, MAX_DIFFICULTY, self.difficulty
            )));
        }

        if !self.solution.is_finite() {
            return Err(CryptroomError::invalid_room(
                "Solution must be a finite number",
            ));
        }

        Ok(())
    }
}

pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!(
            parse_tags(" Puzzle, Math ,,Mystery ,"),
            vec!["Puzzle", "Math", "Mystery"]
        );
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ").is_empty());
    }

    #[test]
    fn test_record_defaults_for_missing_counters() {
        let json = r#"{"name":"Vault","creator":"0xabc","difficulty":3,
            "solution":"FHE-NDI=","creationDate":1700000000,"likes":null}"#;
        let record = RoomRecord::from_bytes(json.as_bytes()).unwrap();

        assert_eq!(record.likes, 0);
        assert_eq!(record.plays, 0);
        assert!(record.tags.is_empty());
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_record_wire_field_names() {
        let record = RoomRecord {
            name: "Vault".to_string(),
            creator: "0xabc".to_string(),
            difficulty: 2,
            solution: "FHE-MQ==".to_string(),
            creation_date: 42,
            likes: 1,
            plays: 2,
            tags: vec!["Logic".to_string()],
            extra: serde_json::Map::new(),
        };
        let value: serde_json::Value = serde_json::from_slice(&record.to_bytes().unwrap()).unwrap();

        assert_eq!(value["creationDate"], 42);
        assert_eq!(value["solution"], "FHE-MQ==");
        assert_eq!(value["tags"][0], "Logic");
    }

    #[test]
    fn test_record_keeps_unknown_fields() {
        let json = r#"{"name":"Vault","creator":"0xabc","difficulty":3,
            "solution":"FHE-NDI=","creationDate":1,"theme":"noir"}"#;
        let record = RoomRecord::from_bytes(json.as_bytes()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&record.to_bytes().unwrap()).unwrap();

        assert_eq!(value["theme"], "noir");
    }

    #[test]
    fn test_new_room_validation() {
        assert!(NewRoom::new("Vault", 3, 42.0, "Math").validate().is_ok());
        assert!(NewRoom::new("  ", 3, 42.0, "").validate().is_err());
        assert!(NewRoom::new("Vault", 0, 42.0, "").validate().is_err());
        assert!(NewRoom::new("Vault", 6, 42.0, "").validate().is_err());
        assert!(NewRoom::new("Vault", 3, f64::NAN, "").validate().is_err());
    }

    #[test]
    fn test_creator_check_ignores_case() {
        let room = Room {
            id: "1-abc".to_string(),
            name: "Vault".to_string(),
            creator: "0xABCdef".to_string(),
            difficulty: 1,
            encrypted_solution: String::new(),
            creation_date: 0,
            likes: 0,
            plays: 0,
            tags: vec![],
        };

        assert!(room.is_creator("0xabcDEF"));
        assert!(!room.is_creator("0xabcdee"));
    }
}
