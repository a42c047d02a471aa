//! Configuration management for the Meteo Events client
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with METEO_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::Credentials;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Meteo Events backend
    pub api: ApiConfig,

    /// AEMET open data API
    pub aemet: AemetConfig,

    /// Backend login used by the status and event commands
    #[serde(default)]
    pub credentials: Option<CredentialsConfig>,

    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend, without the `/api` prefix
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AemetConfig {
    /// Base URL of the AEMET open data API
    pub base_url: String,

    /// AEMET API key
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CredentialsConfig {
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl From<CredentialsConfig> for Credentials {
    fn from(config: CredentialsConfig) -> Self {
        Credentials {
            username: config.username,
            password: config.password,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("METEO_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("api.base_url", "http://localhost:8080")?
            .set_default("api.timeout_secs", 30)?
            .set_default("aemet.base_url", "https://opendata.aemet.es/opendata/api")?
            .set_default("aemet.api_key", "")?
            .set_default("aemet.timeout_secs", 30)?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            .add_source(
                Environment::with_prefix("METEO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Configured backend credentials, if both fields are set
    pub fn credentials(&self) -> Option<Credentials> {
        self.credentials
            .clone()
            .filter(|c| !c.username.is_empty())
            .map(Credentials::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load() {
        let config = Config::load().unwrap();
        assert!(config.aemet.base_url.starts_with("https://"));
        assert!(config.api.timeout_secs > 0);
    }

    #[test]
    fn test_log_format_parsing() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: LogFormat,
        }
        let parsed: Wrapper = serde_json::from_str(r#"{"format": "json"}"#).unwrap();
        assert_eq!(parsed.format, LogFormat::Json);
    }
}
