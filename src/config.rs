//! Configuration surface consumed by the telemetry services.
//!
//! The structs deserialize from whatever configuration store the host embeds
//! them in; validation happens when a service is constructed, not here.

use serde::Deserialize;

use crate::error::ConfigError;

fn default_queue_capacity() -> usize {
    1024
}

fn default_workers() -> usize {
    4
}

/// Settings for the time-series sink.
///
/// With `enabled=false` (the default) service construction is refused and
/// the host installs no sink.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeSeriesConfig {
    /// Whether the time-series sink should be installed at all.
    #[serde(default)]
    pub enabled: bool,
    /// Protocol, host and port of the backend, e.g. `http://localhost:8086`.
    #[serde(default)]
    pub url_base: Option<String>,
    /// Name of the backend database.
    #[serde(default)]
    pub database: Option<String>,
    /// Username credential, passed as a query-string parameter.
    #[serde(default)]
    pub user: Option<String>,
    /// Password credential, passed as a query-string parameter.
    #[serde(default)]
    pub password: Option<String>,
    /// Capacity of the dispatch queue; payloads beyond it are dropped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Number of worker tasks draining the dispatch queue.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for TimeSeriesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url_base: None,
            database: None,
            user: None,
            password: None,
            queue_capacity: default_queue_capacity(),
            workers: default_workers(),
        }
    }
}

impl TimeSeriesConfig {
    /// Builds the full POST endpoint, validating the required settings.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingProperty`] naming the first absent
    /// required setting.
    pub fn endpoint_url(&self) -> Result<String, ConfigError> {
        let url_base = self
            .url_base
            .as_deref()
            .ok_or(ConfigError::MissingProperty("timeseries.url_base"))?;
        let database = self
            .database
            .as_deref()
            .ok_or(ConfigError::MissingProperty("timeseries.database"))?;
        let user = self.user.as_deref().ok_or(ConfigError::MissingProperty("timeseries.user"))?;
        let password =
            self.password.as_deref().ok_or(ConfigError::MissingProperty("timeseries.password"))?;

        Ok(format!("{}/db/{}/series?u={}&p={}", url_base, database, user, password))
    }
}

/// Settings for the metric fan-out facade.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsConfig {
    /// Whether metric publishing is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Registry keys of the publishers to construct, in order.
    #[serde(default)]
    pub publishers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> TimeSeriesConfig {
        TimeSeriesConfig {
            enabled: true,
            url_base: Some("http://localhost:8086".to_owned()),
            database: Some("bridge".to_owned()),
            user: Some("jvb".to_owned()),
            password: Some("secret".to_owned()),
            ..TimeSeriesConfig::default()
        }
    }

    #[test]
    fn endpoint_url_encodes_database_and_credentials() {
        let url = full_config().endpoint_url().unwrap();
        assert_eq!(url, "http://localhost:8086/db/bridge/series?u=jvb&p=secret");
    }

    #[test]
    fn missing_url_base_is_reported_first() {
        let mut config = full_config();
        config.url_base = None;
        assert_eq!(
            config.endpoint_url(),
            Err(ConfigError::MissingProperty("timeseries.url_base"))
        );
    }

    #[test]
    fn missing_password_is_reported() {
        let mut config = full_config();
        config.password = None;
        assert_eq!(
            config.endpoint_url(),
            Err(ConfigError::MissingProperty("timeseries.password"))
        );
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: TimeSeriesConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.enabled);
        assert_eq!(config.queue_capacity, 1024);
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn metrics_config_defaults_to_no_publishers() {
        let config: MetricsConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.enabled);
        assert!(config.publishers.is_empty());
    }
}
