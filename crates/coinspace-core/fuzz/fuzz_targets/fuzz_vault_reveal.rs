//! Fuzz test for seed vault decryption
//!
//! Arbitrary ciphertext must be rejected with an error, never a panic

#![no_main]

use coinspace_core::{AuthToken, SeedVault};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = SeedVault::reveal(s, &AuthToken::new("fuzz-token"));
    }
});
