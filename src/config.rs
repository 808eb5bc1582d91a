//! Propagation configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! default_time_zone = "Europe/Moscow"
//! service_name = "billing"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::location::{load_default, DEFAULT_TIME_ZONE};

/// Settings for a [`Propagator`](crate::Propagator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Zone used when a client sends none or an unknown one
    pub default_time_zone: String,
    /// Name stamped into `from_service` on outbound calls
    pub service_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_time_zone: DEFAULT_TIME_ZONE.to_string(),
            service_name: None,
        }
    }
}

impl Config {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] for malformed TOML and
    /// [`Error::DefaultTimeZone`] if the configured zone cannot be loaded.
    ///
    /// # Examples
    ///
    /// ```
    /// use request_data::Config;
    ///
    /// let config = Config::from_toml_str(r#"service_name = "billing""#).unwrap();
    /// assert_eq!(config.default_time_zone, "Europe/Moscow");
    /// assert_eq!(config.service_name.as_deref(), Some("billing"));
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigRead`] if the file cannot be read, otherwise the
    /// errors of [`Config::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded propagation config");
        Ok(config)
    }

    /// Checks that the default time zone can be loaded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DefaultTimeZone`] otherwise.
    pub fn validate(&self) -> Result<(), Error> {
        load_default(&self.default_time_zone).map(|_| ())
    }
}
