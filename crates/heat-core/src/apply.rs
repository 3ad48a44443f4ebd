//! Writing resolved entries into the service configuration file

use std::path::{Path, PathBuf};

use heat_fs::{IniDocument, SetOutcome};
use serde::Serialize;
use similar::TextDiff;

use crate::output::{ConfigOutput, REDACTED};
use crate::Result;

/// What happened to one entry during an apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryChange {
    /// `section/key`
    pub name: String,
    pub outcome: SetOutcome,
    pub secret: bool,
}

/// Summary of an apply run
#[derive(Debug, Clone)]
pub struct ApplyReport {
    pub path: PathBuf,
    pub changes: Vec<EntryChange>,
    /// Whether the file was rewritten on disk
    pub written: bool,
    redacted_before: String,
    redacted_after: String,
}

impl ApplyReport {
    /// True when at least one entry was added or updated.
    pub fn changed(&self) -> bool {
        self.changes.iter().any(|c| c.outcome.is_change())
    }

    pub fn changed_entries(&self) -> impl Iterator<Item = &EntryChange> {
        self.changes.iter().filter(|c| c.outcome.is_change())
    }

    /// Unified diff of the file with secret values masked.
    ///
    /// A changed secret shows as `[redacted] (changed)` on the new side.
    pub fn diff(&self) -> String {
        if !self.changed() {
            return String::new();
        }
        let path = self.path.display().to_string();
        TextDiff::from_lines(self.redacted_before.as_str(), self.redacted_after.as_str())
            .unified_diff()
            .header(&path, &path)
            .to_string()
    }
}

/// An entry whose on-disk value differs from the resolved one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Drift {
    pub name: String,
    pub secret: bool,
    /// Resolved value, redacted when secret
    pub expected: String,
    /// Value found in the file, redacted when secret; `None` when absent
    pub actual: Option<String>,
}

/// Persists a [`ConfigOutput`] into an INI file
#[derive(Debug, Clone)]
pub struct ConfigApplier {
    path: PathBuf,
}

impl ConfigApplier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<IniDocument> {
        match heat_fs::io::read_text_if_exists(&self.path)? {
            Some(content) => Ok(IniDocument::parse(&content)?),
            None => {
                tracing::debug!(path = %self.path.display(), "Config file absent, starting empty");
                Ok(IniDocument::new())
            }
        }
    }

    /// Set every entry in the file.
    ///
    /// The file is only rewritten when something changed and `dry_run`
    /// is false.
    pub fn apply(&self, output: &ConfigOutput, dry_run: bool) -> Result<ApplyReport> {
        let before = self.load()?;
        let mut after = before.clone();

        let changes = output
            .iter()
            .map(|entry| -> Result<EntryChange> {
                let outcome = after.set(entry.section(), entry.key(), entry.value())?;
                tracing::debug!(
                    entry = %entry.name(),
                    value = %entry.display_value(),
                    ?outcome,
                    "Applied entry"
                );
                Ok(EntryChange {
                    name: entry.name(),
                    outcome,
                    secret: entry.is_secret(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let changed = changes.iter().any(|c| c.outcome.is_change());
        let written = changed && !dry_run;
        if written {
            heat_fs::io::write_atomic(&self.path, after.render().as_bytes())?;
            tracing::info!(path = %self.path.display(), "Updated config file");
        }

        Ok(ApplyReport {
            path: self.path.clone(),
            redacted_before: redact(&before, output, &[])?,
            redacted_after: redact(&after, output, &changes)?,
            changes,
            written,
        })
    }

    /// Compare the file against the resolved entries without writing.
    pub fn check(&self, output: &ConfigOutput) -> Result<Vec<Drift>> {
        let doc = self.load()?;

        let drift = output
            .iter()
            .filter_map(|entry| {
                let actual = doc.get(entry.section(), entry.key());
                if actual == Some(entry.value().trim()) {
                    return None;
                }
                Some(Drift {
                    name: entry.name(),
                    secret: entry.is_secret(),
                    expected: entry.display_value().to_string(),
                    actual: actual.map(|value| {
                        if entry.is_secret() {
                            REDACTED.to_string()
                        } else {
                            value.to_string()
                        }
                    }),
                })
            })
            .collect();

        Ok(drift)
    }
}

/// Render a document with every secret entry masked.
fn redact(doc: &IniDocument, output: &ConfigOutput, changes: &[EntryChange]) -> Result<String> {
    let mut masked = doc.clone();
    for entry in output.iter().filter(|e| e.is_secret()) {
        if masked.get(entry.section(), entry.key()).is_none() {
            continue;
        }
        let name = entry.name();
        let changed = changes
            .iter()
            .any(|c| c.name == name && c.outcome.is_change());
        let marker = if changed {
            format!("{} (changed)", REDACTED)
        } else {
            REDACTED.to_string()
        };
        masked.set(entry.section(), entry.key(), &marker)?;
    }
    Ok(masked.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ConfigEntry;
    use tempfile::TempDir;

    fn output(connection: &str) -> ConfigOutput {
        ConfigOutput::new(vec![
            ConfigEntry::secret("database", "connection", connection),
            ConfigEntry::new("database", "idle_timeout", "3600"),
        ])
    }

    #[test]
    fn diff_never_shows_secret() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("heat.conf");
        std::fs::write(&path, "[database]\nconnection = sqlite:////old.sqlite\n").unwrap();

        let report = ConfigApplier::new(&path)
            .apply(&output("mysql://heat:pw@db/heat"), true)
            .unwrap();

        let diff = report.diff();
        assert!(diff.contains("+connection = [redacted] (changed)"));
        assert!(diff.contains("+idle_timeout = 3600"));
        assert!(!diff.contains("pw@db"));
        assert!(!diff.contains("old.sqlite"));
    }

    #[test]
    fn dry_run_does_not_write() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("heat.conf");

        let report = ConfigApplier::new(&path)
            .apply(&output("sqlite:////var/lib/heat/heat.sqlite"), true)
            .unwrap();

        assert!(report.changed());
        assert!(!report.written);
        assert!(!path.exists());
    }

    #[test]
    fn check_redacts_secret_drift() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("heat.conf");
        std::fs::write(
            &path,
            "[database]\nconnection = mysql://heat:old@db/heat\nidle_timeout = 3600\n",
        )
        .unwrap();

        let drift = ConfigApplier::new(&path)
            .check(&output("mysql://heat:new@db/heat"))
            .unwrap();

        assert_eq!(
            drift,
            vec![Drift {
                name: "database/connection".into(),
                secret: true,
                expected: REDACTED.into(),
                actual: Some(REDACTED.into()),
            }]
        );
    }

    #[test]
    fn multiline_value_is_rejected_before_writing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("heat.conf");
        std::fs::write(&path, "[database]\nidle_timeout = 3600\n").unwrap();

        let err = ConfigApplier::new(&path)
            .apply(&output("sqlite://\n[DEFAULT]\ndebug = True"), false)
            .unwrap_err();

        assert!(matches!(
            err,
            crate::Error::Fs(heat_fs::Error::MultilineValue { .. })
        ));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[database]\nidle_timeout = 3600\n"
        );
    }

    #[test]
    fn padded_value_settles_after_first_apply() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("heat.conf");
        let padded = ConfigOutput::new(vec![ConfigEntry::new("database", "idle_timeout", "3600 ")]);
        let applier = ConfigApplier::new(&path);

        assert!(applier.apply(&padded, false).unwrap().changed());
        assert!(!applier.apply(&padded, false).unwrap().changed());
        assert!(applier.check(&padded).unwrap().is_empty());
    }
}
