pub mod instance;
pub mod manager;

pub use instance::Identity;
pub use manager::IdentityManager;

use crate::error::{CryptroomError, Result};
use bip39::{Language, Mnemonic};
use bitcoin::key::Keypair;
use bitcoin::secp256k1::{PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
use std::str::FromStr;

const DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

pub fn generate_mnemonic() -> Result<String> {
    let mut rng = bip39::rand::thread_rng();
    let mnemonic = Mnemonic::generate_in_with(&mut rng, Language::English, 24)
        .map_err(|e| CryptroomError::internal(format!("Failed to generate mnemonic: {}", e)))?;
    Ok(mnemonic.to_string())
}

pub fn mnemonic_to_keypair(mnemonic: &str) -> Result<Keypair> {
    let mnemonic = Mnemonic::parse_in(Language::English, mnemonic)
        .map_err(|e| CryptroomError::identity(format!("Invalid mnemonic: {}", e)))?;

    let seed = mnemonic.to_seed("");
    let secp = Secp256k1::new();

    let master_key = bitcoin::bip32::Xpriv::new_master(bitcoin::Network::Bitcoin, &seed)
        .map_err(|e| CryptroomError::internal(format!("Failed to derive master key: {}", e)))?;

    let path = bitcoin::bip32::DerivationPath::from_str(DERIVATION_PATH)
        .map_err(|e| CryptroomError::config(format!("Invalid derivation path: {}", e)))?;

    let child_key = master_key
        .derive_priv(&secp, &path)
        .map_err(|e| CryptroomError::internal(format!("Failed to derive child key: {}", e)))?;

    let secret_key = SecretKey::from_slice(&child_key.private_key.secret_bytes())
        .map_err(|e| CryptroomError::internal(format!("Invalid secret key: {}", e)))?;

    Ok(Keypair::from_secret_key(&secp, &secret_key))
}

/// `0x` + last 20 bytes of SHA-256 over the uncompressed key, without its
/// 0x04 prefix byte.
pub fn address_from_public_key(public_key: &PublicKey) -> String {
    let uncompressed = public_key.serialize_uncompressed();
    let digest = Sha256::digest(&uncompressed[1..]);
    format!("0x{}", hex::encode(&digest[12..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_keypair_is_deterministic() {
        let first = mnemonic_to_keypair(MNEMONIC).unwrap();
        let second = mnemonic_to_keypair(MNEMONIC).unwrap();
        assert_eq!(first.public_key(), second.public_key());
    }

    #[test]
    fn test_address_shape() {
        let keypair = mnemonic_to_keypair(MNEMONIC).unwrap();
        let address = address_from_public_key(&keypair.public_key());

        assert_eq!(address.len(), 42);
        assert!(address.starts_with("0x"));
        assert!(address[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_mnemonic_parses() {
        let mnemonic = generate_mnemonic().unwrap();
        assert_eq!(mnemonic.split_whitespace().count(), 24);
        assert!(mnemonic_to_keypair(&mnemonic).is_ok());
    }

    #[test]
    fn test_invalid_mnemonic() {
        assert!(mnemonic_to_keypair("not a real phrase").is_err());
    }
}
