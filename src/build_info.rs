//! Compile-time build metadata
//!
//! Values are stamped in by `build.rs`.

use serde::Serialize;

/// Build number (0 when built without the build script)
pub const BUILD_NUMBER: u64 = parse_build_number(option_env!("SCRAPLESS_BUILD_NUMBER"));

/// UTC build time, ISO 8601
pub const BUILD_TIMESTAMP: &str = match option_env!("SCRAPLESS_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Decimal parse usable in const context; anything malformed is 0
const fn parse_build_number(value: Option<&str>) -> u64 {
    let bytes = match value {
        Some(s) => s.as_bytes(),
        None => return 0,
    };

    let mut n: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i].wrapping_sub(b'0');
        if digit > 9 {
            return 0;
        }
        n = n * 10 + digit as u64;
        i += 1;
    }
    n
}

/// Serializable snapshot of the constants above
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
        }
    }

    /// e.g. `scrapless 1.0.0 (build 42)`
    pub fn label(&self) -> String {
        format!("{} {} (build {})", self.name, self.version, self.build_number)
    }
}

/// Print the startup banner to stderr
pub fn print_startup_banner() {
    let info = BuildInfo::current();
    eprintln!("===============================================");
    eprintln!("  {}", DESCRIPTION);
    eprintln!("  {}", info.label());
    eprintln!("  Compiled: {}", info.build_timestamp);
    eprintln!("===============================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_number() {
        assert_eq!(parse_build_number(None), 0);
        assert_eq!(parse_build_number(Some("1042")), 1042);
        assert_eq!(parse_build_number(Some("12a")), 0);
    }

    #[test]
    fn test_label() {
        let info = BuildInfo::current();
        assert_eq!(info.name, "scrapless");
        assert!(info.label().starts_with(&format!("scrapless {}", VERSION)));
    }
}
