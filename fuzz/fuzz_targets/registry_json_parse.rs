//! Fuzz target for registry JSON parsing and validation.
//!
//! Anything that parses must also survive validation and lookups without
//! panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use samplefetch::registry::io::from_json_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    if let Ok(registry) = from_json_slice(data) {
        let _ = registry.validate();
        let _ = registry.ambiguous_names();
        for name in registry.collection_names() {
            let _ = registry.lookup(name);
        }
    }
});
