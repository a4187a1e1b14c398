//! Runtime configuration.
//!
//! Settings are layered: built-in defaults, then an optional file, then
//! `COURIER__`-prefixed environment variables, e.g.
//! `COURIER__TRANSPORT__TIMEOUT_MS=5000`.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "COURIER_CONFIG";

/// File looked up (with any supported extension) when
/// [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_NAME: &str = "courier";

const ENV_PREFIX: &str = "COURIER";
const ENV_SEPARATOR: &str = "__";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The merged configuration has an unusable value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourierConfig {
    /// HTTP transport settings.
    pub transport: TransportConfig,
}

/// Settings for the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Whole-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Connection timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
    /// Redirects followed before giving up.
    pub max_redirects: usize,
    /// Refuse plain-HTTP URLs.
    pub https_only: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            connect_timeout_ms: 10_000,
            user_agent: concat!("Courier/", env!("CARGO_PKG_VERSION")).to_string(),
            max_redirects: 10,
            https_only: false,
        }
    }
}

impl CourierConfig {
    /// Loads configuration from the file named by `COURIER_CONFIG` (or
    /// `courier.*` in the working directory, if present) and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => ConfigLoader::new().file(PathBuf::from(path)).load(),
            None => ConfigLoader::new().load(),
        }
    }

    /// Checks values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transport.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "transport.timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.transport.connect_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "transport.connect_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builds a [`CourierConfig`] from explicit sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env: Option<Map<String, String>>,
}

impl ConfigLoader {
    /// Creates a loader that reads `courier.*` if present and the process
    /// environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads this file instead; it must exist.
    #[must_use]
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Reads variables from this map instead of the process environment.
    #[must_use]
    pub fn env(mut self, vars: Map<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    /// Merges the sources and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or validation fails.
    pub fn load(self) -> Result<CourierConfig, ConfigError> {
        let file = match self.file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };
        let env = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .source(self.env);

        let config: CourierConfig = Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()?;
        config.validate()?;

        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigLoader::new().env(Map::new()).load().unwrap();
        assert_eq!(config, CourierConfig::default());
        assert_eq!(config.transport.timeout_ms, 30_000);
        assert_eq!(config.transport.connect_timeout_ms, 10_000);
        assert_eq!(config.transport.max_redirects, 10);
        assert!(config.transport.user_agent.starts_with("Courier/"));
        assert!(!config.transport.https_only);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[transport]\ntimeout_ms = 5000\nhttps_only = true").unwrap();

        let config = ConfigLoader::new()
            .file(file.path())
            .env(Map::new())
            .load()
            .unwrap();

        assert_eq!(config.transport.timeout_ms, 5000);
        assert!(config.transport.https_only);
        assert_eq!(config.transport.max_redirects, 10);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[transport]\ntimeout_ms = 5000").unwrap();

        let config = ConfigLoader::new()
            .file(file.path())
            .env(vars(&[
                ("COURIER__TRANSPORT__TIMEOUT_MS", "750"),
                ("COURIER__TRANSPORT__MAX_REDIRECTS", "2"),
            ]))
            .load()
            .unwrap();

        assert_eq!(config.transport.timeout_ms, 750);
        assert_eq!(config.transport.max_redirects, 2);
    }

    #[test]
    fn test_unprefixed_env_is_ignored() {
        let config = ConfigLoader::new()
            .env(vars(&[("TRANSPORT__TIMEOUT_MS", "1")]))
            .load()
            .unwrap();
        assert_eq!(config.transport.timeout_ms, 30_000);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = ConfigLoader::new()
            .env(vars(&[("COURIER__TRANSPORT__TIMEOUT_MS", "0")]))
            .load();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::new()
            .file(dir.path().join("absent.toml"))
            .env(Map::new())
            .load();
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[transport]\ntimeout_ms = \"soon\"").unwrap();

        let result = ConfigLoader::new().file(file.path()).env(Map::new()).load();
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
