use crate::error::{CryptroomError, Result};
use crate::identity::address_from_public_key;

use bitcoin::hashes::Hash;
use bitcoin::key::Keypair;
use bitcoin::secp256k1::{ecdsa::Signature, Message, Secp256k1};
use bitcoin::sign_message::signed_msg_hash;

/// A local signing key standing in for a connected wallet.
pub struct Identity {
    id: String,
    name: String,
    keypair: Keypair,
    address: String,
}

impl Identity {
    pub fn new(id: String, name: String, keypair: Keypair) -> Self {
        let address = address_from_public_key(&keypair.public_key());
        Self {
            id,
            name,
            keypair,
            address,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.keypair.public_key().serialize())
    }

    /// Compact ECDSA signature (hex) over the signed-message hash of `message`.
    pub fn sign_message(&self, message: &str) -> String {
        let secp = Secp256k1::signing_only();
        let digest = Message::from_digest(signed_msg_hash(message).to_byte_array());
        let signature = secp.sign_ecdsa(&digest, &self.keypair.secret_key());
        hex::encode(signature.serialize_compact())
    }

    pub fn verify_message(&self, message: &str, signature_hex: &str) -> Result<bool> {
        let bytes = hex::decode(signature_hex)
            .map_err(|e| CryptroomError::identity(format!("Signature is not hex: {}", e)))?;
        let signature = Signature::from_compact(&bytes)
            .map_err(|e| CryptroomError::identity(format!("Malformed signature: {}", e)))?;

        let secp = Secp256k1::verification_only();
        let digest = Message::from_digest(signed_msg_hash(message).to_byte_array());
        Ok(secp
            .verify_ecdsa(&digest, &signature, &self.keypair.public_key())
            .is_ok())
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("address", &self.address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{generate_mnemonic, mnemonic_to_keypair};

    fn identity(name: &str) -> Identity {
        let keypair = mnemonic_to_keypair(&generate_mnemonic().unwrap()).unwrap();
        Identity::new(format!("{}-id", name), name.to_string(), keypair)
    }

    #[test]
    fn test_sign_and_verify() {
        let alice = identity("alice");
        let signature = alice.sign_message("publickey:0xabc");

        assert!(alice.verify_message("publickey:0xabc", &signature).unwrap());
        assert!(!alice.verify_message("publickey:0xabd", &signature).unwrap());
    }

    #[test]
    fn test_signature_from_other_identity_fails() {
        let alice = identity("alice");
        let bob = identity("bob");
        let signature = bob.sign_message("hello");

        assert!(!alice.verify_message("hello", &signature).unwrap());
        assert!(alice.verify_message("hello", "zz").is_err());
    }
}
