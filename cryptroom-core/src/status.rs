use crate::error::CryptroomError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const SUCCESS_VISIBLE_MS: i64 = 2_000;
const ERROR_VISIBLE_MS: i64 = 3_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Success,
    Error,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Success => write!(f, "success"),
            TransactionStatus::Error => write!(f, "error"),
        }
    }
}

/// Transient notification for the outcome of a ledger write.
///
/// Pending stays up until replaced; success hides after two seconds and
/// errors after three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBanner {
    pub status: TransactionStatus,
    pub message: String,
    pub shown_at: DateTime<Utc>,
    pub hide_at: Option<DateTime<Utc>>,
}

impl StatusBanner {
    pub fn pending(message: impl Into<String>) -> Self {
        Self::at(TransactionStatus::Pending, message, Utc::now())
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::at(TransactionStatus::Success, message, Utc::now())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::at(TransactionStatus::Error, message, Utc::now())
    }

    pub fn at(status: TransactionStatus, message: impl Into<String>, now: DateTime<Utc>) -> Self {
        let hide_at = match status {
            TransactionStatus::Pending => None,
            TransactionStatus::Success => Some(now + Duration::milliseconds(SUCCESS_VISIBLE_MS)),
            TransactionStatus::Error => Some(now + Duration::milliseconds(ERROR_VISIBLE_MS)),
        };

        Self {
            status,
            message: message.into(),
            shown_at: now,
            hide_at,
        }
    }

    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        self.hide_at.map_or(true, |hide_at| now < hide_at)
    }

    pub fn icon(&self) -> &'static str {
        match self.status {
            TransactionStatus::Pending => "…",
            TransactionStatus::Success => "✓",
            TransactionStatus::Error => "✗",
        }
    }
}

impl fmt::Display for StatusBanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.message)
    }
}

/// Banner text for a failed room creation.
pub fn creation_failed(err: &CryptroomError) -> String {
    if err.is_user_rejection() {
        "Transaction rejected by user".to_string()
    } else {
        format!("Creation failed: {}", err)
    }
}

pub fn like_failed(err: &CryptroomError) -> String {
    format!("Failed to like room: {}", err)
}

pub fn play_failed(err: &CryptroomError) -> String {
    format!("Failed to update play count: {}", err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_windows() {
        let now = Utc::now();

        let pending = StatusBanner::at(TransactionStatus::Pending, "Updating room data...", now);
        assert!(pending.is_visible_at(now + Duration::hours(1)));

        let success = StatusBanner::at(TransactionStatus::Success, "Room liked!", now);
        assert!(success.is_visible_at(now + Duration::milliseconds(1_999)));
        assert!(!success.is_visible_at(now + Duration::milliseconds(2_000)));

        let error = StatusBanner::at(TransactionStatus::Error, "nope", now);
        assert!(error.is_visible_at(now + Duration::milliseconds(2_500)));
        assert!(!error.is_visible_at(now + Duration::milliseconds(3_000)));
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            creation_failed(&CryptroomError::SignatureRejected),
            "Transaction rejected by user"
        );
        assert_eq!(
            creation_failed(&CryptroomError::invalid_room("Room name cannot be empty")),
            "Creation failed: Invalid room: Room name cannot be empty"
        );
        assert_eq!(
            like_failed(&CryptroomError::RoomNotFound { id: "x".to_string() }),
            "Failed to like room: Room not found: x"
        );
        assert!(play_failed(&CryptroomError::LedgerUnavailable)
            .starts_with("Failed to update play count"));
    }

    #[test]
    fn test_display() {
        let banner = StatusBanner::success("Play count updated!");
        assert_eq!(banner.to_string(), "✓ Play count updated!");
        assert_eq!(banner.status.to_string(), "success");
    }
}
