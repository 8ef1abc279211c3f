//! Infrastructure layer for chatscope.
//!
//! Contains implementations of the store traits defined in `chatscope-core`
//! (SQLite message, status and subscription stores), the `config.toml`
//! loader and data directory resolution.

pub mod config;
pub mod filesystem;
pub mod sqlite;
