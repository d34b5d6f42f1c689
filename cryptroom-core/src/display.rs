use crate::types::{Room, MAX_DIFFICULTY};
use chrono::Local;

/// `0x1234...abcd`: first six characters, then everything from the 38th on.
pub fn short_address(address: &str) -> String {
    let head: String = address.chars().take(6).collect();
    let tail: String = address.chars().skip(38).collect();
    format!("{}...{}", head, tail)
}

pub fn difficulty_stars(difficulty: u8) -> String {
    (1..=MAX_DIFFICULTY)
        .map(|level| if level <= difficulty { '★' } else { '☆' })
        .collect()
}

/// Creation date in the local time zone, e.g. `2024-03-09`.
pub fn created_date(room: &Room) -> String {
    room.created_at()
        .with_timezone(&Local)
        .format("%Y-%m-%d")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0x52908400098527886E0F7030069857D2E4169EE7"),
            "0x5290...9EE7"
        );
        assert_eq!(short_address("0xab"), "0xab...");
    }

    #[test]
    fn test_difficulty_stars() {
        assert_eq!(difficulty_stars(3), "★★★☆☆");
        assert_eq!(difficulty_stars(5), "★★★★★");
        assert_eq!(difficulty_stars(0), "☆☆☆☆☆");
    }

    #[test]
    fn test_created_date() {
        let noon = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let room = Room {
            id: "1-abc".to_string(),
            name: "Vault".to_string(),
            creator: "0xabc".to_string(),
            difficulty: 1,
            encrypted_solution: String::new(),
            creation_date: noon.timestamp(),
            likes: 0,
            plays: 0,
            tags: vec![],
        };

        let expected = noon.with_timezone(&Local).format("%Y-%m-%d").to_string();
        assert_eq!(created_date(&room), expected);
        assert_eq!(expected.len(), 10);
        assert_eq!(&expected[..8], "2024-03-");
    }
}
