//! Resolve command: print entries without touching any file

use colored::Colorize;

use super::Context;
use crate::error::Result;

pub fn run_resolve(ctx: &Context, json: bool) -> Result<()> {
    let resolution = ctx.resolve()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
        return Ok(());
    }

    println!("{}", "Database Configuration".bold());
    println!();
    for entry in &resolution.output {
        let value = if entry.is_secret() {
            entry.display_value().dimmed().to_string()
        } else {
            entry.display_value().to_string()
        };
        println!("  {:<26} {}", entry.name(), value);
    }
    println!();

    let sync = if resolution.should_sync {
        "yes".green()
    } else {
        "no".yellow()
    };
    println!("  {:<26} {}", "db_sync", sync);

    Ok(())
}
