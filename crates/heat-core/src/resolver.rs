//! Database configuration resolution
//!
//! The `ConfigResolver` turns a [`ConfigParameters`] set into the ordered
//! `[database]` entries heat reads, plus the decision whether the schema
//! sync step has to run.

use crate::facts::Facts;
use crate::output::{ConfigEntry, ConfigOutput, Resolution};
use crate::params::ConfigParameters;
use crate::scheme::ConnectionScheme;
use crate::Result;

/// INI section holding the database options
pub const DATABASE_SECTION: &str = "database";

/// Resolves database parameters into configuration entries
///
/// Resolution is a pure function of the parameters. The host facts are
/// only logged: every platform family yields the same output.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    facts: Facts,
}

impl ConfigResolver {
    pub fn new(facts: Facts) -> Self {
        Self { facts }
    }

    pub fn facts(&self) -> &Facts {
        &self.facts
    }

    /// Validate the parameters and produce the configuration entries
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConnectionString`] when
    /// `database_connection` does not use an accepted backend. No entries
    /// are produced in that case.
    ///
    /// # Example
    ///
    /// ```
    /// use heat_core::{ConfigParameters, ConfigResolver, Facts, OsFamily};
    ///
    /// let resolver = ConfigResolver::new(Facts::new(OsFamily::Debian));
    /// let resolution = resolver.resolve(&ConfigParameters::default()).unwrap();
    /// assert_eq!(resolution.output.len(), 5);
    /// assert!(resolution.should_sync);
    /// ```
    pub fn resolve(&self, params: &ConfigParameters) -> Result<Resolution> {
        let scheme = ConnectionScheme::parse(params.database_connection())?;
        tracing::debug!(
            %scheme,
            os_family = %self.facts.os_family,
            sync_db = params.sync_db(),
            "Resolving database configuration"
        );

        let output = ConfigOutput::new(vec![
            ConfigEntry::secret(DATABASE_SECTION, "connection", params.database_connection()),
            ConfigEntry::new(DATABASE_SECTION, "idle_timeout", params.database_idle_timeout()),
            ConfigEntry::new(DATABASE_SECTION, "min_pool_size", params.database_min_pool_size()),
            ConfigEntry::new(DATABASE_SECTION, "max_retries", params.database_max_retries()),
            ConfigEntry::new(DATABASE_SECTION, "retry_interval", params.database_retry_interval()),
        ]);

        Ok(Resolution {
            output,
            should_sync: params.sync_db(),
        })
    }
}
