//! heat-db CLI
//!
//! Resolves the heat `[database]` settings, writes them into the service
//! configuration and triggers the schema sync when needed.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use commands::Context;
use error::Result;
use heat_core::SyncPolicy;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to initialise logging: {}", "warning".yellow(), e);
    }
    tracing::debug!(command = ?cli.command, "Starting heat-db");

    let ctx = Context {
        os_family: cli.os_family,
        params_file: cli.params,
        assignments: cli.set,
        config_dir: cli.config_dir,
    };

    execute_command(&ctx, cli.command)
}

fn execute_command(ctx: &Context, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Resolve { json } => commands::run_resolve(ctx, json),
        Commands::Apply {
            config_file,
            dry_run,
            sync_on_change,
            sync_command,
        } => {
            let policy = if sync_on_change {
                SyncPolicy::OnChange
            } else {
                SyncPolicy::Always
            };
            commands::run_apply(ctx, &config_file, dry_run, policy, sync_command.as_deref())
        }
        Commands::Check { config_file, json } => commands::run_check(ctx, &config_file, json),
    }
}
