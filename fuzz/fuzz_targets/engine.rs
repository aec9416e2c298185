#![no_main]

use libfuzzer_sys::fuzz_target;
use reqwest::header::HeaderMap;
use url::Url;

use gleaner::{Config, SourceDocument};

fuzz_target!(|data: &[u8]| {
    // Convert raw bytes to string, handling invalid UTF-8 gracefully
    let html = String::from_utf8_lossy(data).to_string();

    let document = SourceDocument::new(
        Url::parse("https://example.com").unwrap(),
        HeaderMap::new(),
        html,
    );

    // The engine should never panic regardless of input
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let _ = rt.block_on(gleaner::articles(&document, &Config::default()));
});
