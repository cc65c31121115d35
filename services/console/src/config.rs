//! services/console/src/config.rs
//!
//! Defines the console's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use reqwest::Url;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Root of the profiles backend; `/api/profiles` and `/uploads` hang off it.
    pub api_base_url: Url,
    pub request_timeout: Duration,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables, with an explicit base
    /// URL taking precedence over `ROSTER_API_URL`.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env_with(api_url_override: Option<&str>) -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok(), api_url_override)
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        api_url_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        // --- Backend Location ---
        let api_url = match api_url_override {
            Some(url) => url.to_string(),
            None => lookup("ROSTER_API_URL")
                .ok_or_else(|| ConfigError::MissingVar("ROSTER_API_URL".to_string()))?,
        };
        let api_base_url = Url::parse(&api_url).map_err(|e| {
            ConfigError::InvalidValue("ROSTER_API_URL".to_string(), e.to_string())
        })?;
        if !matches!(api_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue(
                "ROSTER_API_URL".to_string(),
                format!("'{}' is not an http(s) URL", api_url),
            ));
        }

        // --- Request Settings ---
        let timeout_str =
            lookup("ROSTER_REQUEST_TIMEOUT_SECS").unwrap_or_else(|| "10".to_string());
        let timeout_secs = timeout_str
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "ROSTER_REQUEST_TIMEOUT_SECS".to_string(),
                    format!("'{}' is not a positive number of seconds", timeout_str),
                )
            })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "WARN".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            api_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_the_url_is_set() {
        let config =
            Config::from_lookup(lookup_from(&[("ROSTER_API_URL", "http://localhost:9000")]), None)
                .unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://localhost:9000/");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.log_level, Level::WARN);
    }

    #[test]
    fn missing_url_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[]), None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(var) if var == "ROSTER_API_URL"));
    }

    #[test]
    fn override_wins_over_environment() {
        let config = Config::from_lookup(
            lookup_from(&[("ROSTER_API_URL", "http://localhost:9000")]),
            Some("https://roster.internal/"),
        )
        .unwrap();
        assert_eq!(config.api_base_url.as_str(), "https://roster.internal/");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_url = Config::from_lookup(lookup_from(&[("ROSTER_API_URL", "not a url")]), None);
        assert!(matches!(bad_url, Err(ConfigError::InvalidValue(..))));

        let bad_scheme =
            Config::from_lookup(lookup_from(&[("ROSTER_API_URL", "ftp://files.example")]), None);
        assert!(matches!(bad_scheme, Err(ConfigError::InvalidValue(..))));

        let zero_timeout = Config::from_lookup(
            lookup_from(&[
                ("ROSTER_API_URL", "http://localhost:9000"),
                ("ROSTER_REQUEST_TIMEOUT_SECS", "0"),
            ]),
            None,
        );
        assert!(matches!(
            zero_timeout,
            Err(ConfigError::InvalidValue(var, _)) if var == "ROSTER_REQUEST_TIMEOUT_SECS"
        ));

        let bad_level = Config::from_lookup(
            lookup_from(&[("ROSTER_API_URL", "http://localhost:9000"), ("RUST_LOG", "loud")]),
            None,
        );
        assert!(matches!(bad_level, Err(ConfigError::InvalidValue(var, _)) if var == "RUST_LOG"));
    }
}
