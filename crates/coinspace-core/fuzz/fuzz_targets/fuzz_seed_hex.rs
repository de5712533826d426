//! Fuzz test for stored seed decoding

#![no_main]

use coinspace_core::Seed;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(seed) = Seed::from_hex(s) {
            // Identity is always 64 hex chars
            assert_eq!(seed.identity().as_str().len(), 64);
        }
    }
});
