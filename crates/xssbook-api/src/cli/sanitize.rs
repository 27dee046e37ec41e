//! `sanitize`: show what a content filter stores for a given input.

use anyhow::Result;
use console::style;

use xssbook_core::sanitize;
use xssbook_types::post::SanitizerKind;

pub fn run(mode: SanitizerKind, text: &str, json: bool) -> Result<()> {
    let output = sanitize::apply(mode, text);

    if json {
        let out = serde_json::json!({
            "mode": mode,
            "input": text,
            "output": output,
            "changed": output != text,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {} {}", style("in: ").dim(), text);
    println!("  {} {}", style("out:").cyan().bold(), output);
    if output == text {
        println!("  {}", style(format!("[{mode}: unchanged]")).dim());
    }
    println!();
    Ok(())
}
