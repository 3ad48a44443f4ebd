//! Format-agnostic loading of parameter files

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::{Error, Result, io};

/// Serialization formats accepted for parameter files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Json,
    Yaml,
}

impl FileFormat {
    /// Detect the format from a file extension.
    ///
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "toml" => Ok(FileFormat::Toml),
            "json" => Ok(FileFormat::Json),
            "yaml" | "yml" => Ok(FileFormat::Yaml),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FileFormat::Toml => "TOML",
            FileFormat::Json => "JSON",
            FileFormat::Yaml => "YAML",
        }
    }
}

/// Deserialize a value from source text in the given format.
pub fn parse_str<T: DeserializeOwned>(content: &str, format: FileFormat, path: &Path) -> Result<T> {
    let parsed = match format {
        FileFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        FileFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        FileFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
    };

    parsed.map_err(|message| Error::ParamsParse {
        path: path.to_path_buf(),
        format: format.name().into(),
        message,
    })
}

/// Load a parameter file, detecting the format from its extension.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = FileFormat::from_path(path)?;
    let content = io::read_text(path)?;
    tracing::debug!(path = %path.display(), format = format.name(), "Loading parameter file");
    parse_str(&content, format, path)
}
