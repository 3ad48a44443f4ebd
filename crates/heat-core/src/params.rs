//! Database parameters and their override layers

use serde::{Deserialize, Deserializer};

use crate::{Error, Result};

pub const DEFAULT_DATABASE_CONNECTION: &str = "sqlite:////var/lib/heat/heat.sqlite";
pub const DEFAULT_DATABASE_IDLE_TIMEOUT: &str = "3600";
pub const DEFAULT_DATABASE_MIN_POOL_SIZE: &str = "1";
pub const DEFAULT_DATABASE_MAX_RETRIES: &str = "10";
pub const DEFAULT_DATABASE_RETRY_INTERVAL: &str = "10";
pub const DEFAULT_SYNC_DB: bool = true;

/// Parameter names accepted by [`ParameterLayer::set`]
pub const PARAMETER_KEYS: [&str; 6] = [
    "database_connection",
    "database_idle_timeout",
    "database_min_pool_size",
    "database_max_retries",
    "database_retry_interval",
    "sync_db",
];

/// The named, defaulted input for one resolution.
///
/// Numeric settings are kept as strings and written verbatim, the way
/// they were supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigParameters {
    database_connection: String,
    database_idle_timeout: String,
    database_min_pool_size: String,
    database_max_retries: String,
    database_retry_interval: String,
    sync_db: bool,
}

impl Default for ConfigParameters {
    fn default() -> Self {
        Self {
            database_connection: DEFAULT_DATABASE_CONNECTION.to_string(),
            database_idle_timeout: DEFAULT_DATABASE_IDLE_TIMEOUT.to_string(),
            database_min_pool_size: DEFAULT_DATABASE_MIN_POOL_SIZE.to_string(),
            database_max_retries: DEFAULT_DATABASE_MAX_RETRIES.to_string(),
            database_retry_interval: DEFAULT_DATABASE_RETRY_INTERVAL.to_string(),
            sync_db: DEFAULT_SYNC_DB,
        }
    }
}

impl ConfigParameters {
    pub fn with_database_connection(mut self, value: impl Into<String>) -> Self {
        self.database_connection = value.into();
        self
    }

    pub fn with_database_idle_timeout(mut self, value: impl Into<String>) -> Self {
        self.database_idle_timeout = value.into();
        self
    }

    pub fn with_database_min_pool_size(mut self, value: impl Into<String>) -> Self {
        self.database_min_pool_size = value.into();
        self
    }

    pub fn with_database_max_retries(mut self, value: impl Into<String>) -> Self {
        self.database_max_retries = value.into();
        self
    }

    pub fn with_database_retry_interval(mut self, value: impl Into<String>) -> Self {
        self.database_retry_interval = value.into();
        self
    }

    pub fn with_sync_db(mut self, value: bool) -> Self {
        self.sync_db = value;
        self
    }

    pub fn database_connection(&self) -> &str {
        &self.database_connection
    }

    pub fn database_idle_timeout(&self) -> &str {
        &self.database_idle_timeout
    }

    pub fn database_min_pool_size(&self) -> &str {
        &self.database_min_pool_size
    }

    pub fn database_max_retries(&self) -> &str {
        &self.database_max_retries
    }

    pub fn database_retry_interval(&self) -> &str {
        &self.database_retry_interval
    }

    pub fn sync_db(&self) -> bool {
        self.sync_db
    }
}

/// One source of parameter overrides.
///
/// Every field is optional; a layer only overrides what it sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterLayer {
    #[serde(default)]
    pub database_connection: Option<String>,
    #[serde(default, deserialize_with = "string_or_integer")]
    pub database_idle_timeout: Option<String>,
    #[serde(default, deserialize_with = "string_or_integer")]
    pub database_min_pool_size: Option<String>,
    #[serde(default, deserialize_with = "string_or_integer")]
    pub database_max_retries: Option<String>,
    #[serde(default, deserialize_with = "string_or_integer")]
    pub database_retry_interval: Option<String>,
    #[serde(default)]
    pub sync_db: Option<bool>,
}

impl ParameterLayer {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge `other` on top of this layer; fields set in `other` win.
    pub fn merge(&mut self, other: &ParameterLayer) {
        fn take<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                slot.clone_from(value);
            }
        }

        let ParameterLayer {
            database_connection,
            database_idle_timeout,
            database_min_pool_size,
            database_max_retries,
            database_retry_interval,
            sync_db,
        } = other;

        take(&mut self.database_connection, database_connection);
        take(&mut self.database_idle_timeout, database_idle_timeout);
        take(&mut self.database_min_pool_size, database_min_pool_size);
        take(&mut self.database_max_retries, database_max_retries);
        take(&mut self.database_retry_interval, database_retry_interval);
        take(&mut self.sync_db, sync_db);
    }

    /// Set a single parameter by name from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "database_connection" => self.database_connection = Some(value.to_string()),
            "database_idle_timeout" => self.database_idle_timeout = Some(value.to_string()),
            "database_min_pool_size" => self.database_min_pool_size = Some(value.to_string()),
            "database_max_retries" => self.database_max_retries = Some(value.to_string()),
            "database_retry_interval" => self.database_retry_interval = Some(value.to_string()),
            "sync_db" => {
                let flag = match value.to_ascii_lowercase().as_str() {
                    "true" => true,
                    "false" => false,
                    _ => {
                        return Err(Error::InvalidParameter {
                            key: key.to_string(),
                            message: format!("expected `true` or `false`, got `{}`", value),
                        });
                    }
                };
                self.sync_db = Some(flag);
            }
            _ => {
                return Err(Error::InvalidParameter {
                    key: key.to_string(),
                    message: format!("unknown parameter (expected one of {})", PARAMETER_KEYS.join(", ")),
                });
            }
        }
        Ok(())
    }

    /// Parse a `key=value` assignment and apply it.
    pub fn set_assignment(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| Error::InvalidParameter {
                key: assignment.to_string(),
                message: "expected key=value".to_string(),
            })?;
        self.set(key.trim(), value.trim())
    }

    /// Apply this layer to a full parameter set.
    pub fn apply_to(&self, params: ConfigParameters) -> ConfigParameters {
        let mut full = ParameterLayer::from(params);
        full.merge(self);
        full.or_defaults()
    }

    /// Fill every unset field with its default.
    pub fn or_defaults(self) -> ConfigParameters {
        let defaults = ConfigParameters::default();
        ConfigParameters {
            database_connection: self.database_connection.unwrap_or(defaults.database_connection),
            database_idle_timeout: self
                .database_idle_timeout
                .unwrap_or(defaults.database_idle_timeout),
            database_min_pool_size: self
                .database_min_pool_size
                .unwrap_or(defaults.database_min_pool_size),
            database_max_retries: self.database_max_retries.unwrap_or(defaults.database_max_retries),
            database_retry_interval: self
                .database_retry_interval
                .unwrap_or(defaults.database_retry_interval),
            sync_db: self.sync_db.unwrap_or(defaults.sync_db),
        }
    }
}

/// A layer that sets every parameter
impl From<ConfigParameters> for ParameterLayer {
    fn from(params: ConfigParameters) -> Self {
        Self {
            database_connection: Some(params.database_connection),
            database_idle_timeout: Some(params.database_idle_timeout),
            database_min_pool_size: Some(params.database_min_pool_size),
            database_max_retries: Some(params.database_max_retries),
            database_retry_interval: Some(params.database_retry_interval),
            sync_db: Some(params.sync_db),
        }
    }
}

/// Parameter files may write numeric settings as `3600` or `"3600"`.
fn string_or_integer<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Integer(i64),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Integer(n) => n.to_string(),
    }))
}
