//! Fuzz target for Drive link resolution and interstitial page parsing.
//!
//! Feeds arbitrary text both as a sharing link and as an HTML page,
//! checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use samplefetch::drive::confirm::parse_interstitial;
use samplefetch::drive::resolve::extract_file_id;
use url::Url;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let _ = extract_file_id(text);

    if let Ok(page_url) = Url::parse("https://drive.google.com/uc?id=fuzz&export=download") {
        let _ = parse_interstitial(text, &page_url);
    }
});
