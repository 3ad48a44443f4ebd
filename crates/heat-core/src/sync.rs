//! Database sync decision and subprocess execution
//!
//! With `sync_db` enabled the sync step runs on every apply. The
//! [`SyncPolicy::OnChange`] policy limits it to applies that changed the
//! configuration file.

use std::fmt;
use std::path::Path;
use std::process::Command;

use crate::{Error, Result};

/// Program invoked by the default sync command
pub const DEFAULT_SYNC_PROGRAM: &str = "heat-manage";

/// Why the sync step was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `sync_db` is false
    Disabled,
    /// Nothing in the config file changed
    NoChanges,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Disabled => f.write_str("sync_db is disabled"),
            SkipReason::NoChanges => f.write_str("configuration unchanged"),
        }
    }
}

/// When an enabled sync step runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Run on every apply
    #[default]
    Always,
    /// Run only when the apply changed the configuration file
    OnChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    Run,
    Skip(SkipReason),
}

impl SyncDecision {
    /// `sync_db = false` always skips, whatever the policy.
    pub fn decide(should_sync: bool, config_changed: bool, policy: SyncPolicy) -> Self {
        match (should_sync, policy) {
            (false, _) => SyncDecision::Skip(SkipReason::Disabled),
            (true, SyncPolicy::Always) => SyncDecision::Run,
            (true, SyncPolicy::OnChange) if config_changed => SyncDecision::Run,
            (true, SyncPolicy::OnChange) => SyncDecision::Skip(SkipReason::NoChanges),
        }
    }
}

/// A command line that migrates the database schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncCommand {
    program: String,
    args: Vec<String>,
}

impl SyncCommand {
    /// `heat-manage --config-file <config_file> db_sync`
    pub fn default_for(config_file: &Path) -> Self {
        Self {
            program: DEFAULT_SYNC_PROGRAM.to_string(),
            args: vec![
                "--config-file".to_string(),
                config_file.display().to_string(),
                "db_sync".to_string(),
            ],
        }
    }

    /// Split a whitespace-separated command line. No shell quoting.
    pub fn parse(command_line: &str) -> Result<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or_else(|| Error::InvalidSyncCommand {
            message: "command is empty".to_string(),
        })?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Run the command and return its stdout.
    pub fn run(&self) -> Result<String> {
        tracing::info!(command = %self, "Running database sync");
        let output = Command::new(&self.program).args(&self.args).output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(Error::SyncFailed {
                command: self.to_string(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl fmt::Display for SyncCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_table() {
        use SyncPolicy::{Always, OnChange};

        assert_eq!(SyncDecision::decide(true, false, Always), SyncDecision::Run);
        assert_eq!(SyncDecision::decide(true, true, Always), SyncDecision::Run);
        assert_eq!(SyncDecision::decide(true, true, OnChange), SyncDecision::Run);
        assert_eq!(
            SyncDecision::decide(true, false, OnChange),
            SyncDecision::Skip(SkipReason::NoChanges)
        );
        for policy in [Always, OnChange] {
            assert_eq!(
                SyncDecision::decide(false, true, policy),
                SyncDecision::Skip(SkipReason::Disabled)
            );
        }
    }

    #[test]
    fn default_policy_runs_without_changes() {
        assert_eq!(SyncPolicy::default(), SyncPolicy::Always);
        assert_eq!(
            SyncDecision::decide(true, false, SyncPolicy::default()),
            SyncDecision::Run
        );
    }

    #[test]
    fn default_command_points_at_config_file() {
        let cmd = SyncCommand::default_for(Path::new("/etc/heat/heat.conf"));
        assert_eq!(cmd.to_string(), "heat-manage --config-file /etc/heat/heat.conf db_sync");
    }

    #[test]
    fn parse_rejects_empty_command() {
        assert!(matches!(
            SyncCommand::parse("   "),
            Err(Error::InvalidSyncCommand { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn run_reports_failure_exit_code() {
        let cmd = SyncCommand::parse("sh -c exit_3_please").unwrap();
        // `sh -c exit_3_please` fails with "command not found" (127)
        let err = cmd.run().unwrap_err();
        assert!(matches!(err, Error::SyncFailed { code: 127, .. }));
    }

    #[cfg(unix)]
    #[test]
    fn run_returns_stdout() {
        let cmd = SyncCommand::parse("echo synced").unwrap();
        assert_eq!(cmd.run().unwrap().trim(), "synced");
    }
}
