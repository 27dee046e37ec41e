//! Session CLI commands.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Issue a bearer token for `username` and print it once.
pub async fn issue(state: &AppState, username: &str, json: bool) -> Result<()> {
    let session = state.account_service.issue_session(username).await?;

    if json {
        let out = serde_json::json!({
            "token": session.token,
            "user_id": session.user_id,
            "username": session.username,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Session token for '{}' (save this, it won't be shown again):",
        style("🔑").bold(),
        style(&session.username).cyan()
    );
    println!();
    println!("  {}", style(&session.token).yellow().bold());
    println!();
    println!(
        "  Use it as: {}",
        style("Authorization: Bearer <token>").dim()
    );
    println!();
    Ok(())
}
