//! Apply command: write entries into heat.conf and run db_sync

use std::path::Path;

use colored::Colorize;
use heat_core::{ConfigApplier, SetOutcome, SyncCommand, SyncDecision, SyncPolicy};

use super::Context;
use crate::error::Result;

pub fn run_apply(
    ctx: &Context,
    config_file: &Path,
    dry_run: bool,
    policy: SyncPolicy,
    sync_command: Option<&str>,
) -> Result<()> {
    let resolution = ctx.resolve()?;
    let report = ConfigApplier::new(config_file).apply(&resolution.output, dry_run)?;

    if report.changed() {
        let verb = if dry_run { "Would update" } else { "Updated" };
        println!("{} {}", verb.green().bold(), config_file.display());
        for change in report.changed_entries() {
            let marker = match change.outcome {
                SetOutcome::Added => "+".green(),
                _ => "~".yellow(),
            };
            println!("  {} {}", marker, change.name);
        }
        if dry_run {
            println!();
            print!("{}", report.diff());
        }
    } else {
        println!("{} {} is up to date", "OK".green().bold(), config_file.display());
    }

    let command = match sync_command {
        Some(line) => SyncCommand::parse(line)?,
        None => SyncCommand::default_for(config_file),
    };

    match SyncDecision::decide(resolution.should_sync, report.changed(), policy) {
        SyncDecision::Skip(reason) => {
            println!("{} db_sync ({})", "Skipping".dimmed(), reason);
        }
        SyncDecision::Run if dry_run => {
            println!("{} {}", "Would run".cyan(), command);
        }
        SyncDecision::Run => {
            let stdout = command.run()?;
            println!("{} {}", "Ran".green().bold(), command);
            if !stdout.trim().is_empty() {
                println!("{}", stdout.trim_end());
            }
        }
    }

    Ok(())
}
