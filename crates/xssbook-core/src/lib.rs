//! Business logic and repository trait definitions for XSSBook.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements, the canned-response engine that speaks for persona
//! accounts, and the services that orchestrate messaging and friendships.
//! It depends only on `xssbook-types` -- never on `xssbook-infra` or any
//! database/IO crate.

pub mod chat;
pub mod repository;
pub mod responder;
pub mod sanitize;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
