//! Secret material and identity derivation
//!
//! The seed, the auth token and the PIN only live in memory and are wiped on
//! drop. The identity is the public handle derived from the seed.

use crate::{Error, Result};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::Zeroizing;

/// Entropy length for freshly generated wallets (128 bits, 12 words)
pub const ENTROPY_LEN: usize = 16;

/// Smallest seed accepted for BIP-32 derivation
pub const MIN_SEED_LEN: usize = 16;

/// Largest seed accepted for BIP-32 derivation
pub const MAX_SEED_LEN: usize = 64;

/// Generate fresh wallet entropy from the OS RNG
pub fn generate_entropy() -> Zeroizing<[u8; ENTROPY_LEN]> {
    let mut entropy = Zeroizing::new([0u8; ENTROPY_LEN]);
    rand::rngs::OsRng.fill_bytes(&mut entropy[..]);
    entropy
}

/// Root wallet secret
#[derive(Clone, PartialEq, Eq)]
pub struct Seed(Zeroizing<Vec<u8>>);

impl Seed {
    /// Create from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&bytes.len()) {
            return Err(Error::InvalidSeed(format!(
                "seed must be {}-{} bytes, got {}",
                MIN_SEED_LEN,
                MAX_SEED_LEN,
                bytes.len()
            )));
        }
        Ok(Self(Zeroizing::new(bytes.to_vec())))
    }

    /// Parse from lowercase or uppercase hex
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            hex::decode(encoded.trim()).map_err(|e| Error::InvalidSeed(e.to_string()))?,
        );
        Self::from_bytes(&bytes)
    }

    /// Raw seed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex encoding
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.0.as_slice()))
    }

    /// Derive the public identity for this seed
    pub fn identity(&self) -> Identity {
        Identity::from_seed(self)
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed(<{} bytes redacted>)", self.0.len())
    }
}

/// Public account identifier derived from the seed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// SHA-256 over the seed's hex text, hex encoded.
    ///
    /// Hashing the hex text (not the raw bytes) keeps identities compatible
    /// with accounts already registered on the auth service.
    pub fn from_seed(seed: &Seed) -> Self {
        let digest = Sha256::digest(seed.to_hex().as_bytes());
        Self(hex::encode(digest))
    }

    /// Wrap an identity read back from storage
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Identity string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable encoding of the seed, returned once at creation
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic(Zeroizing<String>);

impl Mnemonic {
    /// Wrap a phrase
    pub fn new(phrase: impl Into<String>) -> Self {
        Self(Zeroizing::new(phrase.into()))
    }

    /// Phrase text
    pub fn phrase(&self) -> &str {
        &self.0
    }

    /// Number of words
    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic(<{} words redacted>)", self.word_count())
    }
}

/// Short-lived credential from the auth gateway; only used as key material
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Wrap a token string
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    /// Token text
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// User PIN
#[derive(Clone, PartialEq, Eq)]
pub struct Pin(Zeroizing<String>);

impl Pin {
    /// Wrap a PIN string
    pub fn new(pin: impl Into<String>) -> Self {
        Self(Zeroizing::new(pin.into()))
    }

    /// PIN text
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_deterministic() {
        let seed = Seed::from_bytes(&[7u8; 64]).unwrap();
        assert_eq!(seed.identity(), seed.clone().identity());
        assert_eq!(seed.identity().as_str().len(), 64);
    }

    #[test]
    fn test_identity_hashes_hex_text() {
        let seed = Seed::from_bytes(&[0u8; 16]).unwrap();
        let expected = hex::encode(Sha256::digest("00".repeat(16).as_bytes()));
        assert_eq!(seed.identity().as_str(), expected);
    }

    #[test]
    fn test_distinct_seeds_distinct_identities() {
        let a = Seed::from_bytes(&[1u8; 32]).unwrap();
        let b = Seed::from_bytes(&[2u8; 32]).unwrap();
        assert_ne!(a.identity(), b.identity());
    }

    #[test]
    fn test_seed_length_bounds() {
        assert!(Seed::from_bytes(&[0u8; 15]).is_err());
        assert!(Seed::from_bytes(&[0u8; 65]).is_err());
        assert!(Seed::from_bytes(&[0u8; 64]).is_ok());
    }

    #[test]
    fn test_seed_hex_roundtrip() {
        let seed = Seed::from_bytes(&[0xab; 32]).unwrap();
        let parsed = Seed::from_hex(&seed.to_hex()).unwrap();
        assert_eq!(parsed, seed);
        assert!(Seed::from_hex("not hex").is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let seed = Seed::from_bytes(&[0xab; 32]).unwrap();
        assert!(!format!("{:?}", seed).contains("ab"));
        assert!(!format!("{:?}", AuthToken::new("tok-secret")).contains("secret"));
        assert!(!format!("{:?}", Pin::new("1234")).contains("1234"));
    }

    #[test]
    fn test_entropy_is_random() {
        assert_ne!(*generate_entropy(), *generate_entropy());
    }
}
