//! Global configuration types for XSSBook.
//!
//! `AppConfig` represents the top-level `config.toml` that controls the
//! persona placeholder credential, responder probabilities, and server
//! binding.

use serde::{Deserialize, Serialize};

use crate::post::SanitizerKind;

/// Top-level configuration.
///
/// Loaded from `~/.xssbook/config.toml`. All fields have defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Placeholder password shared by every persona account.
    #[serde(default = "default_persona_password")]
    pub persona_password: String,

    /// Upper bound on persona friend requests created per generate call.
    #[serde(default = "default_max_generated_requests")]
    pub max_generated_requests: usize,

    #[serde(default)]
    pub responder: ResponderConfig,

    #[serde(default)]
    pub posts: PostsConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_persona_password() -> String {
    "password123".to_string()
}

fn default_max_generated_requests() -> usize {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            persona_password: default_persona_password(),
            max_generated_requests: default_max_generated_requests(),
            responder: ResponderConfig::default(),
            posts: PostsConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Tunables for the canned-response engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderConfig {
    /// Chance of answering an unmatched message with a time-of-day greeting.
    #[serde(default = "default_time_reply_probability")]
    pub time_reply_probability: f64,

    /// Chance of appending the speaker's name to a fallback reply.
    #[serde(default = "default_name_append_probability")]
    pub name_append_probability: f64,

    /// Fixed RNG seed. Replies are nondeterministic when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_time_reply_probability() -> f64 {
    0.10
}

fn default_name_append_probability() -> f64 {
    0.30
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            time_reply_probability: default_time_reply_probability(),
            name_append_probability: default_name_append_probability(),
            seed: None,
        }
    }
}

/// Content filters applied on the post and comment write paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostsConfig {
    #[serde(default = "default_post_sanitizer")]
    pub post_sanitizer: SanitizerKind,
    #[serde(default)]
    pub comment_sanitizer: SanitizerKind,
}

fn default_post_sanitizer() -> SanitizerKind {
    SanitizerKind::Basic
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            post_sanitizer: default_post_sanitizer(),
            comment_sanitizer: SanitizerKind::None,
        }
    }
}

/// HTTP server binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}
