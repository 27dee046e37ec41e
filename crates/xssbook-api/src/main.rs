//! XSSBook CLI and REST API entry point.
//!
//! Binary name: `xssbook`
//!
//! Parses CLI arguments, initializes tracing, the database and services,
//! then dispatches to a command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use xssbook_infra::config::{load_config, resolve_data_dir};
use xssbook_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};

use cli::{Cli, Commands, SessionCommand, UserCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.json_logs, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // These commands never touch the database.
    match &cli.command {
        Commands::Reply {
            message,
            name,
            hour,
        } => {
            let config = load_config(&resolve_data_dir()).await;
            return cli::engine::reply(&config.responder, message, name, *hour, cli.json);
        }
        Commands::Starter => {
            let config = load_config(&resolve_data_dir()).await;
            return cli::engine::starter(&config.responder, cli.json);
        }
        Commands::Sanitize { text, mode } => {
            return cli::sanitize::run(*mode, text, cli.json);
        }
        _ => {}
    }

    let state = AppState::init().await?;

    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            serve(state, &host, port).await?;
        }

        Commands::Seed => {
            cli::user::seed(&state, cli.json).await?;
        }

        Commands::User { action } => match action {
            UserCommand::Create {
                username,
                email,
                name,
                bio,
            } => {
                cli::user::create_user(&state, username, email, name, bio, cli.json).await?;
            }
            UserCommand::List => {
                cli::user::list_users(&state, cli.json).await?;
            }
        },

        Commands::Session { action } => match action {
            SessionCommand::Issue { username } => {
                cli::session::issue(&state, &username, cli.json).await?;
            }
        },

        Commands::Reply { .. } | Commands::Starter | Commands::Sanitize { .. } => {}
    }

    Ok(())
}

async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} XSSBook API listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());
    tracing::info!(%addr, data_dir = %state.data_dir.display(), "Server started");

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// If a handler cannot be installed, that signal source is ignored.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
