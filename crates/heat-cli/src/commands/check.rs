//! Check command: report drift between heat.conf and the resolution

use std::path::Path;

use colored::Colorize;
use heat_core::ConfigApplier;

use super::Context;
use crate::error::{CliError, Result};

pub fn run_check(ctx: &Context, config_file: &Path, json: bool) -> Result<()> {
    let resolution = ctx.resolve()?;
    let drift = ConfigApplier::new(config_file).check(&resolution.output)?;

    if json {
        let output = serde_json::json!({
            "config_file": config_file.display().to_string(),
            "in_sync": drift.is_empty(),
            "drift": drift,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if drift.is_empty() {
        println!("{} {} matches the resolved settings", "OK".green().bold(), config_file.display());
    } else {
        println!("{} {}", "Drift in".yellow().bold(), config_file.display());
        for item in &drift {
            let actual = item.actual.as_deref().unwrap_or("(absent)");
            println!(
                "  {} {}: {} -> {}",
                "~".yellow(),
                item.name,
                actual.dimmed(),
                item.expected
            );
        }
    }

    if drift.is_empty() {
        Ok(())
    } else {
        Err(CliError::Drift { count: drift.len() })
    }
}
