//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default location of the heat service configuration
pub const DEFAULT_CONFIG_FILE: &str = "/etc/heat/heat.conf";

/// heat-db - Resolve and apply heat database settings
#[derive(Parser, Debug)]
#[command(name = "heat-db")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Operating system family of the host (Debian, RedHat).
    /// Read from /etc/os-release when not given.
    #[arg(long, global = true, env = "HEAT_OS_FAMILY")]
    pub os_family: Option<String>,

    /// Parameter file (TOML, JSON or YAML)
    #[arg(long, global = true, value_name = "FILE", env = "HEAT_DB_PARAMS")]
    pub params: Option<PathBuf>,

    /// Override a single parameter, e.g. --set sync_db=false
    #[arg(long = "set", global = true, value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Directory holding the global params.toml
    #[arg(long, global = true, hide = true, env = "HEAT_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the resolved database entries and sync decision
    Resolve {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Write the database entries into the config file and run db_sync
    ///
    /// The sync step runs whenever sync_db is true. With --sync-on-change
    /// it only runs when the file changed.
    ///
    /// Examples:
    ///   heat-db apply
    ///   heat-db apply --dry-run
    ///   heat-db apply --set database_connection=mysql://heat:pw@db/heat
    Apply {
        /// Configuration file to update
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config_file: PathBuf,

        /// Preview changes without writing or syncing
        #[arg(long)]
        dry_run: bool,

        /// Skip the sync step when the file is already up to date
        #[arg(long)]
        sync_on_change: bool,

        /// Command that migrates the schema
        /// (default: heat-manage --config-file <CONFIG_FILE> db_sync)
        #[arg(long, value_name = "CMD")]
        sync_command: Option<String>,
    },

    /// Report entries in the config file that differ from the resolution
    Check {
        /// Configuration file to inspect
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config_file: PathBuf,

        /// Output as JSON for CI/CD integration
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "heat-db",
            "resolve",
            "--set",
            "sync_db=false",
            "--os-family",
            "RedHat",
        ])
        .unwrap();

        assert_eq!(cli.set, vec!["sync_db=false".to_string()]);
        assert_eq!(cli.os_family.as_deref(), Some("RedHat"));
        assert_eq!(cli.command, Commands::Resolve { json: false });
    }

    #[test]
    fn apply_defaults_to_etc_heat() {
        let cli = Cli::try_parse_from(["heat-db", "apply"]).unwrap();
        match cli.command {
            Commands::Apply {
                config_file,
                dry_run,
                sync_on_change,
                ..
            } => {
                assert_eq!(config_file, PathBuf::from(DEFAULT_CONFIG_FILE));
                assert!(!dry_run);
                assert!(!sync_on_change);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["heat-db"]).is_err());
    }
}
