//! Build script for Scrapless
//!
//! Stamps each compilation with a build number and UTC timestamp.
//! The counter lives in `build_number.txt`; `SCRAPLESS_BUILD_NUMBER` in the
//! build environment overrides it (CI builds).

use std::fs;
use std::path::Path;

const COUNTER_FILE: &str = "build_number.txt";

fn read_counter(path: &Path) -> u64 {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn next_build_number() -> u64 {
    println!("cargo:rerun-if-env-changed=SCRAPLESS_BUILD_NUMBER");
    if let Some(n) = std::env::var("SCRAPLESS_BUILD_NUMBER").ok().and_then(|s| s.parse().ok()) {
        return n;
    }

    let path = Path::new(COUNTER_FILE);
    let next = read_counter(path) + 1;
    if let Err(e) = fs::write(path, next.to_string()) {
        println!("cargo:warning=Could not update {}: {}", COUNTER_FILE, e);
    }
    next
}

fn main() {
    println!("cargo:rerun-if-changed=src");

    let build = next_build_number();
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");

    println!("cargo:rustc-env=SCRAPLESS_BUILD_NUMBER={}", build);
    println!("cargo:rustc-env=SCRAPLESS_BUILD_TIMESTAMP={}", timestamp);
    println!("cargo:warning=Scrapless build #{} at {}", build, timestamp);
}
