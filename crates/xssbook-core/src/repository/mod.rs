//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (xssbook-infra) implements. The core crate never depends on any
//! specific storage technology.
//!
//! All traits use native async fn in traits (RPITIT, Rust 2024 edition).

pub mod friendship;
pub mod message;
pub mod notification;
pub mod post;
pub mod session;
pub mod user;
