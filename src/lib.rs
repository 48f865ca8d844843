//! Scrapless Library
//!
//! Unit conversion, impact estimation, and waste/pantry tracking for food items.

pub mod build_info;
pub mod config;
pub mod conversion;
pub mod db;
pub mod impact;
pub mod mcp;
pub mod models;
pub mod tools;
