//! Signature-gated solution reveal.
//!
//! The creator signs a session message before the solution is decoded.
//! The signature is checked against the signer's own key and nothing else:
//! it is not tied to the solution, and the ledger never sees it. Anyone with
//! the record can decode the solution; this gate only keeps honest clients
//! from showing it to non-creators.

use crate::error::{CryptroomError, Result};
use crate::identity::Identity;
use crate::ledger::KeyValueLedger;
use crate::obfuscation::deobfuscate;
use crate::types::Room;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

const PUBLIC_KEY_HEX_LEN: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealSession {
    pub public_key: String,
    pub contract_address: String,
    pub chain_id: u64,
    pub start_timestamp: i64,
    pub duration_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealedSolution {
    pub room_id: String,
    pub value: f64,
    pub message: String,
    pub signature: String,
}

impl RevealSession {
    pub fn new(contract_address: impl Into<String>, chain_id: u64, duration_days: u32) -> Self {
        Self {
            public_key: generate_public_key(),
            contract_address: contract_address.into(),
            chain_id,
            start_timestamp: Utc::now().timestamp(),
            duration_days,
        }
    }

    pub fn for_ledger(ledger: &dyn KeyValueLedger, duration_days: u32) -> Self {
        Self::new(ledger.contract_address(), ledger.chain_id(), duration_days)
    }

    /// The exact text handed to the signer.
    pub fn message(&self) -> String {
        format!(
            "publickey:{}\ncontractAddresses:{}\ncontractsChainId:{}\nstartTimestamp:{}\ndurationDays:{}",
            self.public_key,
            self.contract_address,
            self.chain_id,
            self.start_timestamp,
            self.duration_days
        )
    }

    /// Fails when the window runs past the last representable date.
    pub fn expires_at(&self) -> Result<DateTime<Utc>> {
        let start =
            DateTime::from_timestamp(self.start_timestamp, 0).unwrap_or(DateTime::UNIX_EPOCH);
        Duration::try_days(i64::from(self.duration_days))
            .and_then(|window| start.checked_add_signed(window))
            .ok_or_else(|| {
                CryptroomError::config(format!(
                    "Reveal window of {} days is out of range",
                    self.duration_days
                ))
            })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> Result<bool> {
        Ok(now > self.expires_at()?)
    }

    /// Decode `room`'s solution for its creator.
    ///
    /// `approve` is shown the message and decides whether to sign it;
    /// returning `false` aborts with [`CryptroomError::SignatureRejected`].
    pub fn reveal<F>(&self, identity: &Identity, room: &Room, approve: F) -> Result<RevealedSolution>
    where
        F: FnOnce(&str) -> Result<bool>,
    {
        if !room.is_creator(identity.address()) {
            return Err(CryptroomError::NotCreator {
                creator: room.creator.clone(),
            });
        }

        let expires_at = self.expires_at()?;
        if Utc::now() > expires_at {
            return Err(CryptroomError::identity(format!(
                "Reveal session expired at {}",
                expires_at
            )));
        }

        let message = self.message();
        if !approve(&message)? {
            return Err(CryptroomError::SignatureRejected);
        }

        let signature = identity.sign_message(&message);
        if !identity.verify_message(&message, &signature)? {
            return Err(CryptroomError::InvalidSignature);
        }

        let value = deobfuscate(&room.encrypted_solution)?;
        tracing::info!("{} revealed the solution of room {}", identity.address(), room.id);

        Ok(RevealedSolution {
            room_id: room.id.clone(),
            value,
            message,
            signature,
        })
    }
}

/// `0x` followed by 2000 random hex digits.
pub fn generate_public_key() -> String {
    let mut rng = rand::rng();
    let digits: String = (0..PUBLIC_KEY_HEX_LEN)
        .map(|_| {
            char::from_digit(rng.random_range(0..16u32), 16).unwrap_or('0')
        })
        .collect();
    format!("0x{}", digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{generate_mnemonic, mnemonic_to_keypair};
    use crate::obfuscation::obfuscate;

    fn identity(name: &str) -> Identity {
        let keypair = mnemonic_to_keypair(&generate_mnemonic().unwrap()).unwrap();
        Identity::new(format!("{}-id", name), name.to_string(), keypair)
    }

    fn room_by(creator: &str, solution: f64) -> Room {
        Room {
            id: "1700000000000-abc1234".to_string(),
            name: "Vault".to_string(),
            creator: creator.to_string(),
            difficulty: 3,
            encrypted_solution: obfuscate(solution).unwrap(),
            creation_date: 1_700_000_000,
            likes: 0,
            plays: 0,
            tags: vec![],
        }
    }

    #[test]
    fn test_message_format() {
        let session = RevealSession {
            public_key: "0xabc".to_string(),
            contract_address: "0x1234".to_string(),
            chain_id: 11155111,
            start_timestamp: 1_700_000_000,
            duration_days: 30,
        };

        assert_eq!(
            session.message(),
            "publickey:0xabc\ncontractAddresses:0x1234\ncontractsChainId:11155111\nstartTimestamp:1700000000\ndurationDays:30"
        );
    }

    #[test]
    fn test_generated_public_key() {
        let key = generate_public_key();
        assert_eq!(key.len(), PUBLIC_KEY_HEX_LEN + 2);
        assert!(key[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_creator_can_reveal() {
        let alice = identity("alice");
        let room = room_by(&alice.address().to_uppercase().replace("0X", "0x"), -3.5);
        let session = RevealSession::new("0x1234", 1, 30);

        let revealed = session.reveal(&alice, &room, |_| Ok(true)).unwrap();

        assert_eq!(revealed.value, -3.5);
        assert_eq!(revealed.message, session.message());
        assert!(alice.verify_message(&revealed.message, &revealed.signature).unwrap());
    }

    #[test]
    fn test_non_creator_is_refused_before_signing() {
        let alice = identity("alice");
        let bob = identity("bob");
        let room = room_by(alice.address(), 9.0);
        let session = RevealSession::new("0x1234", 1, 30);

        let result = session.reveal(&bob, &room, |_| panic!("must not ask to sign"));
        assert!(matches!(result, Err(CryptroomError::NotCreator { .. })));
    }

    #[test]
    fn test_rejected_signature() {
        let alice = identity("alice");
        let room = room_by(alice.address(), 9.0);
        let session = RevealSession::new("0x1234", 1, 30);

        let result = session.reveal(&alice, &room, |_| Ok(false));
        assert!(matches!(result, Err(CryptroomError::SignatureRejected)));
    }

    #[test]
    fn test_expired_session() {
        let alice = identity("alice");
        let room = room_by(alice.address(), 9.0);
        let mut session = RevealSession::new("0x1234", 1, 1);
        session.start_timestamp -= 2 * 24 * 3600;

        assert!(session.is_expired_at(Utc::now()).unwrap());
        assert!(session.reveal(&alice, &room, |_| Ok(true)).is_err());
    }

    #[test]
    fn test_out_of_range_window_is_an_error() {
        let alice = identity("alice");
        let room = room_by(alice.address(), 9.0);
        let session = RevealSession::new("0x1234", 1, 100_000_000);

        assert!(matches!(session.expires_at(), Err(CryptroomError::Config(_))));
        let result = session.reveal(&alice, &room, |_| panic!("must not ask to sign"));
        assert!(matches!(result, Err(CryptroomError::Config(_))));
    }
}
