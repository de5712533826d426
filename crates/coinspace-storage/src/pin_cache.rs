//! Quick-unlock PIN cache
//!
//! Keeps the PIN on the device so biometric unlock can replay it against the
//! auth gateway. The record is encrypted with a key embedded in the app, which
//! only keeps the PIN out of plain view in local storage; it is not an
//! authentication boundary.

use crate::{KeyValueStore, Result};
use coinspace_core::{EncryptionAlgorithm, Pin, SymmetricKey};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Local storage key of the PIN record
pub const PIN_STORAGE_KEY: &str = "_pin_cs";

const PIN_KEY_MATERIAL: &[u8] = b"pinCoinSpace";

/// Local PIN record store, gated by quick-unlock availability
pub struct PinCache {
    store: Arc<dyn KeyValueStore>,
    key: SymmetricKey,
    quick_unlock: AtomicBool,
}

impl PinCache {
    /// Cache over `store`; quick unlock starts disabled
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: SymmetricKey::derive(PIN_KEY_MATERIAL, EncryptionAlgorithm::AesGcm),
            quick_unlock: AtomicBool::new(false),
        }
    }

    /// Mark biometric quick unlock as available on this device
    pub fn enable_quick_unlock(&self) {
        self.quick_unlock.store(true, Ordering::SeqCst);
        tracing::debug!("Quick unlock enabled");
    }

    /// Whether quick unlock was enabled
    pub fn quick_unlock_available(&self) -> bool {
        self.quick_unlock.load(Ordering::SeqCst)
    }

    /// Persist `pin`. Returns `false` without touching storage while quick
    /// unlock is disabled.
    pub fn save(&self, pin: &Pin) -> Result<bool> {
        if !self.quick_unlock_available() {
            return Ok(false);
        }
        let encrypted = self.key.encrypt_to_string(pin.expose().as_bytes())?;
        self.store.set(PIN_STORAGE_KEY, &encrypted)?;
        tracing::debug!("Cached PIN for quick unlock");
        Ok(true)
    }

    /// Stored PIN, if any
    pub fn load(&self) -> Result<Option<Pin>> {
        let Some(encrypted) = self.store.get(PIN_STORAGE_KEY)? else {
            return Ok(None);
        };
        let plaintext = self.key.decrypt_from_str(&encrypted)?;
        let pin = std::str::from_utf8(&plaintext)
            .map_err(|e| crate::Error::Encryption(format!("PIN record is not UTF-8: {}", e)))?;
        Ok(Some(Pin::new(pin)))
    }

    /// Remove the stored PIN
    pub fn clear(&self) -> Result<()> {
        self.store.remove(PIN_STORAGE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryKeyValueStore;

    fn cache() -> (Arc<MemoryKeyValueStore>, PinCache) {
        let store = Arc::new(MemoryKeyValueStore::new());
        let cache = PinCache::new(store.clone());
        (store, cache)
    }

    #[test]
    fn test_save_is_noop_until_enabled() {
        let (store, cache) = cache();
        assert!(!cache.save(&Pin::new("1234")).unwrap());
        assert!(store.get(PIN_STORAGE_KEY).unwrap().is_none());
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn test_save_load_clear() {
        let (store, cache) = cache();
        cache.enable_quick_unlock();
        assert!(cache.save(&Pin::new("1234")).unwrap());

        let raw = store.get(PIN_STORAGE_KEY).unwrap().unwrap();
        assert!(!raw.contains("1234"));
        assert_eq!(cache.load().unwrap(), Some(Pin::new("1234")));

        cache.clear().unwrap();
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn test_record_readable_by_new_cache() {
        let (store, cache) = cache();
        cache.enable_quick_unlock();
        cache.save(&Pin::new("0000")).unwrap();

        // Fresh process: the flag resets, the record survives
        let restarted = PinCache::new(store);
        assert!(!restarted.quick_unlock_available());
        assert_eq!(restarted.load().unwrap(), Some(Pin::new("0000")));
    }

    #[test]
    fn test_corrupt_record_is_encryption_error() {
        let (store, cache) = cache();
        store.set(PIN_STORAGE_KEY, "garbage").unwrap();
        assert!(matches!(cache.load(), Err(crate::Error::Encryption(_))));
    }
}
