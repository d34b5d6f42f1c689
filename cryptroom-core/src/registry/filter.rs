use crate::types::Room;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tags offered by the room browser. `All` disables tag filtering.
pub const KNOWN_TAGS: [&str; 7] = [
    "All",
    "Puzzle",
    "Adventure",
    "Horror",
    "Math",
    "Logic",
    "Mystery",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagFilter {
    #[default]
    All,
    Tag(String),
}

impl FromStr for TagFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "All" {
            Ok(TagFilter::All)
        } else {
            Ok(TagFilter::Tag(s.to_string()))
        }
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagFilter::All => write!(f, "All"),
            TagFilter::Tag(tag) => write!(f, "{}", tag),
        }
    }
}

/// Search text plus tag selection. Both have to match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomFilter {
    pub search: String,
    pub tag: TagFilter,
}

impl RoomFilter {
    pub fn new(search: impl Into<String>, tag: TagFilter) -> Self {
        Self {
            search: search.into(),
            tag,
        }
    }

    pub fn matches(&self, room: &Room) -> bool {
        let matches_search = room
            .name
            .to_lowercase()
            .contains(&self.search.to_lowercase());

        let matches_tag = match &self.tag {
            TagFilter::All => true,
            TagFilter::Tag(tag) => room.has_tag(tag),
        };

        matches_search && matches_tag
    }

    pub fn apply<'a>(&self, rooms: &'a [Room]) -> Vec<&'a Room> {
        rooms.iter().filter(|room| self.matches(room)).collect()
    }
}
