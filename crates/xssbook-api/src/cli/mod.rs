//! CLI command definitions for the `xssbook` binary.
//!
//! Uses clap derive macros. Operators provision accounts and sessions here;
//! `serve` starts the REST API.

pub mod engine;
pub mod sanitize;
pub mod session;
pub mod user;

use clap::{Parser, Subcommand};

/// XSSBook social backend with canned-reply personas.
#[derive(Parser)]
#[command(name = "xssbook", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as newline-delimited JSON.
    #[arg(long, global = true, env = "XSSBOOK_JSON_LOGS")]
    pub json_logs: bool,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long, global = true, env = "XSSBOOK_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to the configured port).
        #[arg(long, short)]
        port: Option<u16>,

        /// Host to bind to (defaults to the configured host).
        #[arg(long)]
        host: Option<String>,
    },

    /// Create the built-in persona accounts if the database is empty.
    Seed,

    /// Manage user accounts.
    User {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Manage bearer sessions.
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },

    /// Ask the response engine for a reply without touching the database.
    Reply {
        /// Message to answer.
        message: String,

        /// Name of the person being answered.
        #[arg(long, default_value = xssbook_core::responder::DEFAULT_SPEAKER_NAME)]
        name: String,

        /// Hour of day (0-23) used for time-of-day replies. Defaults to now.
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
        hour: Option<u32>,
    },

    /// Print a random conversation starter.
    Starter,

    /// Run text through a post/comment content filter.
    Sanitize {
        /// Text to filter.
        text: String,

        /// Filter to apply: none, basic, partial or blacklist.
        #[arg(long, short, default_value = "basic")]
        mode: xssbook_types::post::SanitizerKind,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Create a human account. Prompts for missing values.
    Create {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Display name.
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },

    /// List all accounts.
    #[command(alias = "ls")]
    List,
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Issue a bearer token for a user (shown once).
    Issue {
        username: String,
    },
}
