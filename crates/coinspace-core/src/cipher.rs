//! Symmetric encryption primitives
//!
//! AEAD envelope shared by the seed vault and the local PIN cache:
//! `[version(1)][algorithm(1)][nonce(12)][ciphertext+tag]`, base64 encoded
//! when it leaves the process.

use crate::{Error, Result};
use aes_gcm::Aes256Gcm;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305,
};
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

const ENVELOPE_VERSION: u8 = 1;
const NONCE_LEN: usize = 12;
const HEADER_LEN: usize = 2 + NONCE_LEN;

/// Encryption algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionAlgorithm {
    /// AES-256-GCM
    AesGcm,
    /// ChaCha20-Poly1305
    ChaCha20Poly1305,
}

impl EncryptionAlgorithm {
    fn tag(&self) -> u8 {
        match self {
            EncryptionAlgorithm::AesGcm => 0,
            EncryptionAlgorithm::ChaCha20Poly1305 => 1,
        }
    }
}

/// 256-bit symmetric key bound to one algorithm
#[derive(Clone)]
pub struct SymmetricKey {
    key: Zeroizing<[u8; 32]>,
    algorithm: EncryptionAlgorithm,
}

impl SymmetricKey {
    /// Derive a key by hashing arbitrary key material with SHA-256
    pub fn derive(material: &[u8], algorithm: EncryptionAlgorithm) -> Self {
        let digest: [u8; 32] = Sha256::digest(material).into();
        Self {
            key: Zeroizing::new(digest),
            algorithm,
        }
    }

    /// Algorithm this key encrypts with
    pub fn algorithm(&self) -> EncryptionAlgorithm {
        self.algorithm
    }

    /// Encrypt data into a binary envelope
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::rngs::OsRng.fill_bytes(&mut nonce);

        let ciphertext = match self.algorithm {
            EncryptionAlgorithm::AesGcm => {
                let key = aes_gcm::Key::<Aes256Gcm>::from_slice(&self.key[..]);
                Aes256Gcm::new(key).encrypt(aes_gcm::Nonce::from_slice(&nonce), plaintext)
            }
            EncryptionAlgorithm::ChaCha20Poly1305 => {
                let key = chacha20poly1305::Key::from_slice(&self.key[..]);
                ChaCha20Poly1305::new(key)
                    .encrypt(chacha20poly1305::Nonce::from_slice(&nonce), plaintext)
            }
        }
        .map_err(|e| Error::Other(format!("Encryption failed: {}", e)))?;

        let mut result = Vec::with_capacity(HEADER_LEN + ciphertext.len());
        result.push(ENVELOPE_VERSION);
        result.push(self.algorithm.tag());
        result.extend_from_slice(&nonce);
        result.extend_from_slice(&ciphertext);
        Ok(result)
    }

    /// Decrypt a binary envelope
    pub fn decrypt(&self, data: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        if data.len() <= HEADER_LEN {
            return Err(Error::Decryption("Invalid ciphertext length".to_string()));
        }

        let version = data[0];
        if version != ENVELOPE_VERSION {
            return Err(Error::Decryption(format!(
                "Unsupported encryption version: {}",
                version
            )));
        }

        let algorithm = data[1];
        if algorithm != self.algorithm.tag() {
            return Err(Error::Decryption(format!(
                "Algorithm mismatch: expected {}, got {}",
                self.algorithm.tag(),
                algorithm
            )));
        }

        let nonce = &data[2..HEADER_LEN];
        let ciphertext = &data[HEADER_LEN..];

        let plaintext = match self.algorithm {
            EncryptionAlgorithm::AesGcm => {
                let key = aes_gcm::Key::<Aes256Gcm>::from_slice(&self.key[..]);
                Aes256Gcm::new(key).decrypt(aes_gcm::Nonce::from_slice(nonce), ciphertext)
            }
            EncryptionAlgorithm::ChaCha20Poly1305 => {
                let key = chacha20poly1305::Key::from_slice(&self.key[..]);
                ChaCha20Poly1305::new(key)
                    .decrypt(chacha20poly1305::Nonce::from_slice(nonce), ciphertext)
            }
        }
        // AEAD errors are opaque; a wrong key and a tampered envelope look the same.
        .map_err(|_| Error::Decryption("Authentication failed".to_string()))?;

        Ok(Zeroizing::new(plaintext))
    }

    /// Encrypt and base64 encode
    pub fn encrypt_to_string(&self, plaintext: &[u8]) -> Result<String> {
        Ok(STANDARD.encode(self.encrypt(plaintext)?))
    }

    /// Base64 decode and decrypt
    pub fn decrypt_from_str(&self, encoded: &str) -> Result<Zeroizing<Vec<u8>>> {
        let data = STANDARD
            .decode(encoded.trim())
            .map_err(|e| Error::Decryption(format!("Invalid envelope encoding: {}", e)))?;
        self.decrypt(&data)
    }
}
