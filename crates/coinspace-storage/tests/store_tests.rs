//! File-backed store tests
//!
//! Records written through one database handle must be readable after the
//! process "restarts" and the file is opened again.

use coinspace_core::{AuthToken, Pin, Seed, SeedVault};
use coinspace_storage::{
    CredentialStore, Database, PinCache, SqliteCredentialStore, SqliteKeyValueStore,
};
use std::sync::Arc;
use tempfile::TempDir;

fn open(dir: &TempDir) -> Arc<Database> {
    Arc::new(Database::open(dir.path().join("wallet.db")).unwrap())
}

#[test]
fn test_encrypted_seed_survives_restart() {
    let dir = TempDir::new().unwrap();
    let seed = Seed::from_bytes(&[0x11; 64]).unwrap();
    let token = AuthToken::new("session-token");

    {
        let store = SqliteCredentialStore::new(open(&dir));
        let record = SeedVault::seal_record(&seed, &token).unwrap();
        store.save_encrypted_seed(&record).unwrap();
    }

    let store = SqliteCredentialStore::new(open(&dir));
    let record = store.get_credentials().unwrap().unwrap();
    assert_eq!(record.id, seed.identity());
    assert_eq!(SeedVault::reveal(&record.seed, &token).unwrap(), seed);
}

#[test]
fn test_stored_record_holds_no_plaintext_seed() {
    let dir = TempDir::new().unwrap();
    let seed = Seed::from_bytes(&[0x22; 64]).unwrap();

    let store = SqliteCredentialStore::new(open(&dir));
    store
        .save_encrypted_seed(&SeedVault::seal_record(&seed, &AuthToken::new("t")).unwrap())
        .unwrap();

    let record = store.get_credentials().unwrap().unwrap();
    assert!(!record.seed.contains(seed.to_hex().as_str()));
}

#[test]
fn test_pin_record_survives_restart() {
    let dir = TempDir::new().unwrap();
    {
        let cache = PinCache::new(Arc::new(SqliteKeyValueStore::new(open(&dir))));
        cache.enable_quick_unlock();
        cache.save(&Pin::new("4321")).unwrap();
    }

    let cache = PinCache::new(Arc::new(SqliteKeyValueStore::new(open(&dir))));
    assert_eq!(cache.load().unwrap(), Some(Pin::new("4321")));
}

#[test]
fn test_stores_share_one_database() {
    let dir = TempDir::new().unwrap();
    let db = open(&dir);
    let credentials = SqliteCredentialStore::new(db.clone());
    let pins = PinCache::new(Arc::new(SqliteKeyValueStore::new(db)));

    pins.enable_quick_unlock();
    pins.save(&Pin::new("1111")).unwrap();
    credentials.delete_credentials().unwrap();

    assert!(pins.load().unwrap().is_some());
}
