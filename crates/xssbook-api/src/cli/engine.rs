//! Direct access to the response engine: `reply` and `starter`.

use anyhow::Result;
use console::style;

use xssbook_core::responder::ResponseEngine;
use xssbook_types::config::ResponderConfig;

/// Print the reply the engine would give to `message`.
pub fn reply(
    config: &ResponderConfig,
    message: &str,
    name: &str,
    hour: Option<u32>,
    json: bool,
) -> Result<()> {
    let engine = ResponseEngine::from_config(config);
    let hour = hour.unwrap_or_else(current_hour);
    let reply = engine.respond(message, name, hour);

    if json {
        let out = serde_json::json!({
            "category": reply.category.to_string(),
            "reply": reply.text,
            "hour": hour,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {} {}", style("you:").dim(), message);
    println!("  {} {}", style("persona:").cyan().bold(), reply.text);
    println!("  {}", style(format!("[{}]", reply.category)).dim());
    println!();
    Ok(())
}

/// Print one conversation starter.
pub fn starter(config: &ResponderConfig, json: bool) -> Result<()> {
    let engine = ResponseEngine::from_config(config);
    let text = engine.get_conversation_starter();

    if json {
        println!("{}", serde_json::json!({ "starter": text }));
    } else {
        println!("{text}");
    }
    Ok(())
}

fn current_hour() -> u32 {
    use chrono::Timelike;
    chrono::Local::now().hour()
}
