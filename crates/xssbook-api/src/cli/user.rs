//! Account CLI commands: seed, create, list.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::{Input, Password};

use xssbook_types::user::CreateUserRequest;

use crate::state::AppState;

/// Create the persona accounts and their posts on an empty database.
pub async fn seed(state: &AppState, json: bool) -> Result<()> {
    let created = state.account_service.seed_personas().await?;
    let posts = state.post_service.seed_posts().await?;

    if json {
        println!("{}", serde_json::json!({ "created": created, "posts": posts }));
        return Ok(());
    }

    println!();
    if created == 0 {
        println!(
            "  {} Users already exist, nothing seeded.",
            style("i").blue().bold()
        );
    } else {
        println!(
            "  {} Seeded {} persona accounts in {}",
            style("✓").green().bold(),
            style(created).bold(),
            style(state.data_dir.display()).dim()
        );
    }
    if posts > 0 {
        println!(
            "  {} Seeded {} persona posts",
            style("✓").green().bold(),
            style(posts).bold()
        );
    }
    println!();
    Ok(())
}

/// Create a human account, prompting for anything not given as a flag.
///
/// ```bash
/// xssbook user create --username dana --email dana@example.com --name "Dana"
/// ```
pub async fn create_user(
    state: &AppState,
    username: Option<String>,
    email: Option<String>,
    name: Option<String>,
    bio: Option<String>,
    json: bool,
) -> Result<()> {
    let username = match username {
        Some(u) => u,
        None => Input::<String>::new().with_prompt("Username").interact_text()?,
    };
    let email = match email {
        Some(e) => e,
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };
    let name = match name {
        Some(n) => n,
        None => Input::<String>::new()
            .with_prompt("Display name")
            .default(username.clone())
            .interact_text()?,
    };
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let user = state
        .account_service
        .create_user(CreateUserRequest {
            username,
            email,
            name,
            password,
            bio,
            avatar: None,
        })
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    println!();
    println!("  {} User created", style("✓").green().bold());
    println!();
    println!("  {}  {}", style("Username:").bold(), style(&user.username).cyan());
    println!("  {}      {}", style("Name:").bold(), user.name);
    println!("  {}        {}", style("ID:").bold(), style(user.id.to_string()).dim());
    println!();
    println!(
        "  Issue a token with: {}",
        style(format!("xssbook session issue {}", user.username)).yellow()
    );
    println!();
    Ok(())
}

/// List all accounts in a table, flagging personas.
pub async fn list_users(state: &AppState, json: bool) -> Result<()> {
    let users = state.account_service.list_users().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&users)?);
        return Ok(());
    }

    if users.is_empty() {
        println!();
        println!(
            "  {} No users yet. Seed personas with: {}",
            style("i").blue().bold(),
            style("xssbook seed").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Username").fg(Color::White),
        Cell::new("Email").fg(Color::White),
        Cell::new("Kind").fg(Color::White),
        Cell::new("Joined").fg(Color::White),
    ]);

    for user in &users {
        let kind = if state.personas.is_persona(user).await {
            Cell::new("persona").fg(Color::Magenta)
        } else {
            Cell::new("human").fg(Color::Green)
        };
        table.add_row(vec![
            Cell::new(&user.name).fg(Color::Cyan),
            Cell::new(&user.username),
            Cell::new(&user.email),
            kind,
            Cell::new(user.created_at.format("%Y-%m-%d").to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} user{}",
        style(users.len()).bold(),
        if users.len() == 1 { "" } else { "s" }
    );
    println!();
    Ok(())
}
