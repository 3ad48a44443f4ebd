//! Command implementations

mod apply;
mod check;
mod resolve;

use std::path::{Path, PathBuf};

use heat_core::{ConfigResolver, Facts, OsFamily, ParameterLayer, ParameterSources, Resolution};

use crate::error::Result;

pub use apply::run_apply;
pub use check::run_check;
pub use resolve::run_resolve;

const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Inputs shared by every command
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub os_family: Option<String>,
    pub params_file: Option<PathBuf>,
    pub assignments: Vec<String>,
    pub config_dir: Option<PathBuf>,
}

impl Context {
    /// Host facts from the flag, or from os-release.
    pub fn facts(&self) -> Result<Facts> {
        let facts = match &self.os_family {
            Some(family) => Facts::new(family.parse::<OsFamily>().unwrap_or_else(|e| match e {})),
            None => Facts::from_os_release_file(Path::new(OS_RELEASE_PATH))?,
        };
        if !facts.os_family.is_supported() {
            tracing::warn!(os_family = %facts.os_family, "Unrecognised OS family");
        }
        Ok(facts)
    }

    /// Gather parameters from every layer.
    pub fn sources(&self) -> Result<ParameterSources> {
        let mut overrides = ParameterLayer::default();
        for assignment in &self.assignments {
            overrides.set_assignment(assignment)?;
        }

        let mut sources = ParameterSources::new().with_overrides(overrides);
        if let Some(dir) = &self.config_dir {
            sources = sources.with_global_config_dir(dir);
        }
        if let Some(file) = &self.params_file {
            sources = sources.with_params_file(file);
        }
        Ok(sources)
    }

    /// Load parameters and resolve them.
    pub fn resolve(&self) -> Result<Resolution> {
        let params = self.sources()?.load()?;
        let resolver = ConfigResolver::new(self.facts()?);
        Ok(resolver.resolve(&params)?)
    }
}
