//! Runtime configuration
//!
//! Settings are read from the environment; every value has a default.

use std::path::PathBuf;

/// Environment variable overriding the database location
pub const DATABASE_PATH_VAR: &str = "SCRAPLESS_DATABASE_PATH";

/// Log directive applied on top of `RUST_LOG`
pub const DEFAULT_LOG_DIRECTIVE: &str = "scrapless=info";

/// Resolved runtime settings
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
}

impl Config {
    /// Load configuration from the environment
    pub fn from_env() -> Self {
        let database_path = match std::env::var(DATABASE_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => {
                tracing::debug!("{} not set, using default database path", DATABASE_PATH_VAR);
                default_database_path()
            }
        };

        Self { database_path }
    }
}

/// `<project>/data/scrapless.db`, found relative to the running executable
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(parent) = path.parent() {
            if let Some(grandparent) = parent.parent() {
                path = grandparent.to_path_buf();
            }
        }
    }

    path.push("data");
    path.push("scrapless.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_database_path() {
        let path = default_database_path();
        assert!(path.ends_with("data/scrapless.db"));
    }
}
