//! Storage layer
//!
//! SQLite persistence for waste entries and pantry items.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult, PooledConn};
