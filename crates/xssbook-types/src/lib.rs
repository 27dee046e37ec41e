//! Shared domain types for XSSBook.
//!
//! This crate contains the core domain types used across the XSSBook
//! workspace: users, direct messages, friendships, notifications, posts, global
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod friendship;
pub mod message;
pub mod notification;
pub mod post;
pub mod user;
