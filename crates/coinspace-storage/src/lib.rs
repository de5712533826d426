//! SQLite storage for the Coin Space wallet
//!
//! Persists the encrypted seed record and the local key/value data used for
//! quick unlock, with schema migrations and in-memory variants of each store.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod credentials;
pub mod database;
pub mod error;
pub mod local_store;
pub mod migrations;
pub mod pin_cache;

pub use credentials::{CredentialStore, MemoryCredentialStore, SqliteCredentialStore};
pub use database::Database;
pub use error::{Error, Result};
pub use local_store::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use pin_cache::{PinCache, PIN_STORAGE_KEY};
