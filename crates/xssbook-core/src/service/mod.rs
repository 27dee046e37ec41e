//! Business logic services (use cases).
//!
//! Services orchestrate repository calls and business rules. They depend on
//! traits (ports) -- never on concrete infrastructure implementations.

pub mod account;
pub mod credential;
pub mod friendship;
pub mod hash;
pub mod notification;
pub mod persona;
pub mod post;
pub mod seed;
