//! Application configuration.
//!
//! Endpoints and credentials come from `GIFTREE_*` environment variables.
//! Use the builder methods to override them, e.g. in tests.
//!
//! ```ignore
//! use giftree::config::AppConfig;
//!
//! let config = AppConfig::from_env()?
//!     .with_cataas_url("http://localhost:3000");
//! ```

use thiserror::Error;

pub const ENV_CATAAS_URL: &str = "GIFTREE_CATAAS_URL";
pub const ENV_TREFLE_URL: &str = "GIFTREE_TREFLE_URL";
pub const ENV_TREFLE_TOKEN: &str = "GIFTREE_TREFLE_TOKEN";
pub const ENV_APPWRITE_ENDPOINT: &str = "GIFTREE_APPWRITE_ENDPOINT";
pub const ENV_APPWRITE_PROJECT_ID: &str = "GIFTREE_APPWRITE_PROJECT_ID";
pub const ENV_APPWRITE_DATABASE_ID: &str = "GIFTREE_APPWRITE_DATABASE_ID";
pub const ENV_APPWRITE_USERS_TABLE_ID: &str = "GIFTREE_APPWRITE_USERS_TABLE_ID";

const DEFAULT_CATAAS_URL: &str = "http://localhost:3000";
const DEFAULT_TREFLE_URL: &str = "https://trefle.io/api/v1";
const DEFAULT_APPWRITE_ENDPOINT: &str = "https://cloud.appwrite.io/v1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0} is not set")]
    Missing(&'static str),
    #[error("Invalid URL in {var}: {value}")]
    InvalidUrl { var: &'static str, value: String },
}

/// Backend project coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub users_table_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Cat-image endpoint (returns `{url}`)
    pub cataas_url: String,
    /// Plant-data API base URL
    pub trefle_url: String,
    /// Plant-data API token; only needed for the trees screen
    pub trefle_token: Option<String>,
    /// Backend coordinates; `None` runs without accounts
    pub backend: Option<BackendConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cataas_url: DEFAULT_CATAAS_URL.to_string(),
            trefle_url: DEFAULT_TREFLE_URL.to_string(),
            trefle_token: None,
            backend: None,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_vars(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`.
    ///
    /// The backend section is present when a project id is set; the database
    /// and table ids are then required.
    pub fn from_env_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        if let Some(url) = non_empty(ENV_CATAAS_URL) {
            config.cataas_url = validate_url(ENV_CATAAS_URL, url)?;
        }
        if let Some(url) = non_empty(ENV_TREFLE_URL) {
            config.trefle_url = validate_url(ENV_TREFLE_URL, url)?;
        }
        config.trefle_token = non_empty(ENV_TREFLE_TOKEN);

        if let Some(project_id) = non_empty(ENV_APPWRITE_PROJECT_ID) {
            let endpoint = match non_empty(ENV_APPWRITE_ENDPOINT) {
                Some(url) => validate_url(ENV_APPWRITE_ENDPOINT, url)?,
                None => DEFAULT_APPWRITE_ENDPOINT.to_string(),
            };
            config.backend = Some(BackendConfig {
                endpoint,
                project_id,
                database_id: non_empty(ENV_APPWRITE_DATABASE_ID)
                    .ok_or(ConfigError::Missing(ENV_APPWRITE_DATABASE_ID))?,
                users_table_id: non_empty(ENV_APPWRITE_USERS_TABLE_ID)
                    .ok_or(ConfigError::Missing(ENV_APPWRITE_USERS_TABLE_ID))?,
            });
        }

        Ok(config)
    }

    pub fn with_cataas_url(mut self, url: impl Into<String>) -> Self {
        self.cataas_url = url.into();
        self
    }

    pub fn with_trefle_url(mut self, url: impl Into<String>) -> Self {
        self.trefle_url = url.into();
        self
    }

    pub fn with_trefle_token(mut self, token: impl Into<String>) -> Self {
        self.trefle_token = Some(token.into());
        self
    }

    pub fn with_backend(mut self, backend: BackendConfig) -> Self {
        self.backend = Some(backend);
        self
    }

    /// The plant-data token, or an error naming the variable to set.
    pub fn require_trefle_token(&self) -> Result<&str, ConfigError> {
        self.trefle_token
            .as_deref()
            .ok_or(ConfigError::Missing(ENV_TREFLE_TOKEN))
    }

    pub fn require_backend(&self) -> Result<&BackendConfig, ConfigError> {
        self.backend
            .as_ref()
            .ok_or(ConfigError::Missing(ENV_APPWRITE_PROJECT_ID))
    }
}

fn validate_url(var: &'static str, value: String) -> Result<String, ConfigError> {
    match reqwest::Url::parse(&value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(value),
        _ => Err(ConfigError::InvalidUrl { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = AppConfig::from_env_vars(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.cataas_url, "http://localhost:3000");
        assert!(config.backend.is_none());
        assert_eq!(
            config.require_trefle_token(),
            Err(ConfigError::Missing(ENV_TREFLE_TOKEN))
        );
    }

    #[test]
    fn test_full_env() {
        let config = AppConfig::from_env_vars(lookup(&[
            (ENV_CATAAS_URL, "https://cataas.com/cat/gif?json=true"),
            (ENV_TREFLE_TOKEN, "secret"),
            (ENV_APPWRITE_PROJECT_ID, "proj"),
            (ENV_APPWRITE_DATABASE_ID, "main"),
            (ENV_APPWRITE_USERS_TABLE_ID, "user-profiles"),
        ]))
        .unwrap();

        assert_eq!(config.require_trefle_token(), Ok("secret"));
        let backend = config.require_backend().unwrap();
        assert_eq!(backend.endpoint, DEFAULT_APPWRITE_ENDPOINT);
        assert_eq!(backend.users_table_id, "user-profiles");
    }

    #[test]
    fn test_backend_requires_database_id() {
        let err = AppConfig::from_env_vars(lookup(&[(ENV_APPWRITE_PROJECT_ID, "proj")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_APPWRITE_DATABASE_ID));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = AppConfig::from_env_vars(lookup(&[(ENV_TREFLE_URL, "ftp://plants")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { var: ENV_TREFLE_URL, .. }));
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = AppConfig::from_env_vars(lookup(&[(ENV_TREFLE_TOKEN, "  ")])).unwrap();
        assert!(config.trefle_token.is_none());
    }

    #[test]
    fn test_builder() {
        let config = AppConfig::new()
            .with_cataas_url("http://127.0.0.1:9000")
            .with_trefle_token("t");
        assert_eq!(config.cataas_url, "http://127.0.0.1:9000");
        assert_eq!(config.trefle_token.as_deref(), Some("t"));
    }
}
