//! Infrastructure layer for XSSBook.
//!
//! Contains implementations of the repository traits defined in `xssbook-core`
//! (SQLite storage), the credential and digest adapters (Argon2, SHA-256),
//! and the `config.toml` loader.

pub mod config;
pub mod crypto;
pub mod sqlite;
