//! Configuration loader for XSSBook.
//!
//! Reads `config.toml` from the data directory (`~/.xssbook/` in production)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use xssbook_types::config::AppConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "XSSBOOK_DATA_DIR";

/// Resolve the data directory: `XSSBOOK_DATA_DIR`, else `~/.xssbook`,
/// else `./.xssbook` when no home directory is known.
pub fn resolve_data_dir() -> PathBuf {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".xssbook"),
    }
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`AppConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => sanitize(config),
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Clamp probabilities into `[0, 1]`.
fn sanitize(mut config: AppConfig) -> AppConfig {
    let responder = &mut config.responder;
    for (name, p) in [
        ("time_reply_probability", &mut responder.time_reply_probability),
        ("name_append_probability", &mut responder.name_append_probability),
    ] {
        if !(0.0..=1.0).contains(&*p) {
            let clamped = if p.is_nan() { 0.0 } else { (*p).clamp(0.0, 1.0) };
            tracing::warn!("responder.{name} = {p} is out of range, using {clamped}");
            *p = clamped;
        }
    }
    config
}
