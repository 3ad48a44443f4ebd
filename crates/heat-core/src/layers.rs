//! Layered parameter sources
//!
//! Parameters are assembled from a hierarchy of sources, later ones
//! overriding earlier ones field by field:
//!
//! 1. Built-in defaults
//! 2. Global parameters (`<config_dir>/heat-config/params.toml`)
//! 3. An explicit parameter file (TOML, JSON or YAML)
//! 4. Command-line overrides

use std::path::PathBuf;

use crate::params::{ConfigParameters, ParameterLayer};
use crate::Result;

/// Name of the directory under the platform config dir
pub const GLOBAL_DIR_NAME: &str = "heat-config";

/// Builds a [`ConfigParameters`] from all configured sources
#[derive(Debug, Clone, Default)]
pub struct ParameterSources {
    /// Override for the global config directory (used for testing).
    /// When `None`, `dirs::config_dir()` is used.
    global_config_dir_override: Option<PathBuf>,

    /// Explicit parameter file; it must exist when set
    params_file: Option<PathBuf>,

    overrides: ParameterLayer,
}

impl ParameterSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom global config directory instead of the platform one.
    pub fn with_global_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.global_config_dir_override = Some(dir.into());
        self
    }

    pub fn with_params_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.params_file = Some(path.into());
        self
    }

    pub fn with_overrides(mut self, overrides: ParameterLayer) -> Self {
        self.overrides = overrides;
        self
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref override_dir) = self.global_config_dir_override {
            return Some(override_dir.clone());
        }
        dirs::config_dir().map(|d| d.join(GLOBAL_DIR_NAME))
    }

    /// Merge every layer into a single parameter set.
    ///
    /// A missing global file is skipped. A missing explicit file, an
    /// unparsable file or an unknown key is an error.
    pub fn load(&self) -> Result<ConfigParameters> {
        let mut merged = ParameterLayer::default();

        // Layer 2 - global parameters
        if let Some(global_dir) = self.global_config_dir() {
            let global_path = global_dir.join("params.toml");
            if global_path.is_file() {
                tracing::debug!(?global_path, "Loading global parameters (layer 2)");
                let layer: ParameterLayer = heat_fs::store::load(&global_path)?;
                merged.merge(&layer);
            } else {
                tracing::debug!(?global_path, "No global parameters found (layer 2), skipping");
            }
        }

        // Layer 3 - explicit parameter file
        if let Some(ref params_file) = self.params_file {
            tracing::debug!(?params_file, "Loading parameter file (layer 3)");
            let layer: ParameterLayer = heat_fs::store::load(params_file)?;
            merged.merge(&layer);
        }

        // Layer 4 - command-line overrides
        if !self.overrides.is_empty() {
            tracing::debug!("Applying command-line overrides (layer 4)");
            merged.merge(&self.overrides);
        }

        // Layer 1 - defaults fill whatever is still unset
        Ok(merged.or_defaults())
    }
}
