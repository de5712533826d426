//! Persisted credentials
//!
//! One encrypted seed record per device. Only ciphertext and the public
//! identity are ever written.

use crate::{Database, Result};
use coinspace_core::{EncryptedSeedRecord, Identity};
use parking_lot::RwLock;
use rusqlite::{params, OptionalExtension};
use std::sync::Arc;

/// Storage for the encrypted seed record
pub trait CredentialStore: Send + Sync {
    /// Stored record, if any
    fn get_credentials(&self) -> Result<Option<EncryptedSeedRecord>>;

    /// Replace the stored record
    fn save_encrypted_seed(&self, record: &EncryptedSeedRecord) -> Result<()>;

    /// Remove the stored record; a missing record is not an error
    fn delete_credentials(&self) -> Result<()>;
}

/// SQLite-backed credential store
pub struct SqliteCredentialStore {
    db: Arc<Database>,
}

impl SqliteCredentialStore {
    /// Create a store over an open database
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl CredentialStore for SqliteCredentialStore {
    fn get_credentials(&self) -> Result<Option<EncryptedSeedRecord>> {
        self.db.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT identity, seed FROM credentials WHERE slot = 0",
                    [],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
                )
                .optional()?;
            Ok(row.map(|(id, seed)| EncryptedSeedRecord {
                id: Identity::from_stored(id),
                seed,
            }))
        })
    }

    fn save_encrypted_seed(&self, record: &EncryptedSeedRecord) -> Result<()> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO credentials (slot, identity, seed, updated_at) VALUES (0, ?1, ?2, ?3)
                 ON CONFLICT(slot) DO UPDATE SET
                    identity = excluded.identity,
                    seed = excluded.seed,
                    updated_at = excluded.updated_at",
                params![record.id.as_str(), record.seed, chrono::Utc::now().timestamp()],
            )?;
            Ok(())
        })?;
        tracing::debug!("Saved encrypted seed for identity {}", record.id);
        Ok(())
    }

    fn delete_credentials(&self) -> Result<()> {
        let removed = self
            .db
            .with_conn(|conn| Ok(conn.execute("DELETE FROM credentials", [])?))?;
        tracing::debug!("Deleted {} credential record(s)", removed);
        Ok(())
    }
}

/// In-memory credential store
#[derive(Default)]
pub struct MemoryCredentialStore {
    record: RwLock<Option<EncryptedSeedRecord>>,
}

impl MemoryCredentialStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get_credentials(&self) -> Result<Option<EncryptedSeedRecord>> {
        Ok(self.record.read().clone())
    }

    fn save_encrypted_seed(&self, record: &EncryptedSeedRecord) -> Result<()> {
        *self.record.write() = Some(record.clone());
        Ok(())
    }

    fn delete_credentials(&self) -> Result<()> {
        *self.record.write() = None;
        Ok(())
    }
}
