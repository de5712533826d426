//! Fuzz test for history records coming from network backends
//!
//! Any record that deserializes must normalize or be rejected on every network
//! of its family, never panic

#![no_main]

use coinspace_core::{normalize, RawTransaction};
use coinspace_params::NetworkName;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = serde_json::from_slice::<RawTransaction>(data) else {
        return;
    };
    for network in NetworkName::ALL {
        if network.family() == raw.family() {
            if let Ok(tx) = normalize(&raw, network) {
                assert_eq!(tx.is_confirmed, tx.confirmations >= tx.min_conf);
            }
        }
    }
});
