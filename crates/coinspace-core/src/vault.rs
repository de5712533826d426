//! Seed vault
//!
//! Encrypts the seed under a key derived from the auth token. The PIN never
//! reaches the vault: only a token the auth gateway issued after validating
//! the PIN can reveal the seed. The vault is pure; persisting the ciphertext
//! is the caller's job.

use crate::cipher::{EncryptionAlgorithm, SymmetricKey};
use crate::keys::{AuthToken, Identity, Seed};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Encrypted seed paired with the identity it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSeedRecord {
    /// Identity the seed belongs to
    pub id: Identity,
    /// Base64 envelope of the seed
    pub seed: String,
}

/// Token-keyed seed encryption
pub struct SeedVault;

impl SeedVault {
    fn key_for(token: &AuthToken) -> SymmetricKey {
        SymmetricKey::derive(token.expose().as_bytes(), EncryptionAlgorithm::ChaCha20Poly1305)
    }

    /// Encrypt `seed` with key material from `token`
    pub fn protect(seed: &Seed, token: &AuthToken) -> Result<String> {
        Self::key_for(token).encrypt_to_string(seed.as_bytes())
    }

    /// Decrypt `ciphertext`; fails with [`Error::Decryption`] on a wrong or
    /// expired token and on corrupt input
    pub fn reveal(ciphertext: &str, token: &AuthToken) -> Result<Seed> {
        let plaintext = Self::key_for(token).decrypt_from_str(ciphertext)?;
        Seed::from_bytes(&plaintext).map_err(|e| Error::Decryption(e.to_string()))
    }

    /// Build the persisted record for `seed`
    pub fn seal_record(seed: &Seed, token: &AuthToken) -> Result<EncryptedSeedRecord> {
        Ok(EncryptedSeedRecord {
            id: seed.identity(),
            seed: Self::protect(seed, token)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> Seed {
        Seed::from_bytes(&[0x42; 64]).unwrap()
    }

    #[test]
    fn test_protect_reveal_roundtrip() {
        let token = AuthToken::new("token-1");
        let ciphertext = SeedVault::protect(&seed(), &token).unwrap();
        assert_eq!(SeedVault::reveal(&ciphertext, &token).unwrap(), seed());
    }

    #[test]
    fn test_wrong_token_is_decryption_error() {
        let ciphertext = SeedVault::protect(&seed(), &AuthToken::new("token-1")).unwrap();
        let err = SeedVault::reveal(&ciphertext, &AuthToken::new("token-2")).unwrap_err();
        assert!(matches!(err, Error::Decryption(_)));
    }

    #[test]
    fn test_corrupt_ciphertext_is_decryption_error() {
        let token = AuthToken::new("token-1");
        assert!(matches!(
            SeedVault::reveal("AAAA", &token),
            Err(Error::Decryption(_))
        ));
        assert!(matches!(
            SeedVault::reveal("", &token),
            Err(Error::Decryption(_))
        ));
    }

    #[test]
    fn test_seal_record_carries_identity() {
        let token = AuthToken::new("token-1");
        let record = SeedVault::seal_record(&seed(), &token).unwrap();
        assert_eq!(record.id, seed().identity());
        assert_eq!(SeedVault::reveal(&record.seed, &token).unwrap(), seed());
    }
}
