use thiserror::Error;

pub type Result<T> = std::result::Result<T, CryptroomError>;

#[derive(Error, Debug)]
pub enum CryptroomError {
    #[error("Identity error: {0}")]
    Identity(String),

    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("Ledger is not available")]
    LedgerUnavailable,

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Obfuscation error: {0}")]
    Obfuscation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid room: {0}")]
    InvalidRoom(String),

    #[error("Room not found: {id}")]
    RoomNotFound { id: String },

    #[error("Identity not found: {name}")]
    IdentityNotFound { name: String },

    #[error("Only the room creator {creator} can reveal the solution")]
    NotCreator { creator: String },

    #[error("user rejected signature request")]
    SignatureRejected,

    #[error("Signature verification failed")]
    InvalidSignature,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

impl CryptroomError {
    pub fn identity(msg: impl Into<String>) -> Self {
        Self::Identity(msg.into())
    }

    pub fn ledger(msg: impl Into<String>) -> Self {
        Self::Ledger(msg.into())
    }

    pub fn obfuscation(msg: impl Into<String>) -> Self {
        Self::Obfuscation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_room(msg: impl Into<String>) -> Self {
        Self::InvalidRoom(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn dialog(msg: impl Into<String>) -> Self {
        Self::Dialog(msg.into())
    }

    /// True when the failure came from the user declining to sign.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::SignatureRejected) || self.to_string().contains("user rejected")
    }
}

impl From<base64::DecodeError> for CryptroomError {
    fn from(err: base64::DecodeError) -> Self {
        CryptroomError::Obfuscation(format!("invalid base64 payload: {}", err))
    }
}

// conversion from dialoguer::Error
impl From<dialoguer::Error> for CryptroomError {
    fn from(err: dialoguer::Error) -> Self {
        CryptroomError::Dialog(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_rejection_detection() {
        assert!(CryptroomError::SignatureRejected.is_user_rejection());
        assert!(CryptroomError::ledger("user rejected transaction").is_user_rejection());
        assert!(!CryptroomError::ledger("out of gas").is_user_rejection());
    }
}
