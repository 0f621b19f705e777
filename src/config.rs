//! Configuration Module
//!
//! Loads and validates server configuration from a YAML file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default object store base URL
pub const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com";

/// Server configuration parameters.
///
/// Field names follow the camelCase keys of the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Cache capacity in kilobytes
    pub cache_size: u64,
    /// Reserved, parsed but not interpreted
    #[serde(default)]
    pub unit: Option<String>,
    /// Backing store location (`file://<dir>` or an object store bucket)
    pub bucket: String,
    /// HTTP server port
    pub port: u16,
    /// Object store base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Maximum number of concurrent backing store reads
    #[serde(default = "default_max_inflight_fetches")]
    pub max_inflight_fetches: usize,
    /// Deadline in seconds for a single backing store read
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_max_inflight_fetches() -> usize {
    64
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Reads, parses and validates the config file at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml(&contents)
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_size == 0 {
            return Err(ConfigError::Invalid(
                "cacheSize must be greater than 0".to_string(),
            ));
        }
        if self.bucket.trim().is_empty() {
            return Err(ConfigError::Invalid("bucket cannot be empty".to_string()));
        }
        if self.max_inflight_fetches == 0 {
            return Err(ConfigError::Invalid(
                "maxInflightFetches must be greater than 0".to_string(),
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "fetchTimeoutSecs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Cache capacity in kilobytes.
    pub fn cache_size_kb(&self) -> f64 {
        self.cache_size as f64
    }

    /// Deadline for a single backing store read.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Defaults for every optional field.
///
/// `bucket` has no sensible default and is left empty, so the result does
/// not pass [`Config::validate`] until a bucket is set, for example with
/// struct update syntax.
impl Default for Config {
    fn default() -> Self {
        Self {
            cache_size: 1024,
            unit: None,
            bucket: String::new(),
            port: 8080,
            endpoint: default_endpoint(),
            max_inflight_fetches: default_max_inflight_fetches(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default_needs_a_bucket() {
        assert!(matches!(
            Config::default().validate(),
            Err(ConfigError::Invalid(_))
        ));

        let config = Config {
            bucket: "assets".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_size, 1024);
        assert_eq!(config.port, 8080);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.max_inflight_fetches, 64);
        assert_eq!(config.fetch_timeout_secs, 30);
    }

    #[test]
    fn test_config_from_yaml_minimal() {
        let yaml = "cacheSize: 500\nunit: KB\nbucket: my-bucket\nport: 9000\n";
        let config = Config::from_yaml(yaml).unwrap();

        assert_eq!(config.cache_size, 500);
        assert_eq!(config.unit.as_deref(), Some("KB"));
        assert_eq!(config.bucket, "my-bucket");
        assert_eq!(config.port, 9000);
        // Optional keys fall back to defaults
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.max_inflight_fetches, 64);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_from_yaml_overrides() {
        let yaml = r#"
cacheSize: 10
bucket: "file:///srv/blobs"
port: 3000
endpoint: "http://127.0.0.1:4443"
maxInflightFetches: 4
fetchTimeoutSecs: 2
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert!(config.unit.is_none());
        assert_eq!(config.endpoint, "http://127.0.0.1:4443");
        assert_eq!(config.max_inflight_fetches, 4);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(2));
        assert_eq!(config.cache_size_kb(), 10.0);
    }

    #[test]
    fn test_config_missing_required_field() {
        let yaml = "cacheSize: 500\nport: 9000\n";
        assert!(matches!(
            Config::from_yaml(yaml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_config_malformed_yaml() {
        assert!(matches!(
            Config::from_yaml("cacheSize: [unclosed"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_config_rejects_zero_cache_size() {
        let yaml = "cacheSize: 0\nbucket: b\nport: 1\n";
        assert!(matches!(
            Config::from_yaml(yaml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_config_rejects_empty_bucket() {
        let yaml = "cacheSize: 1\nbucket: \"  \"\nport: 1\n";
        assert!(matches!(
            Config::from_yaml(yaml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cacheSize: 64\nbucket: blobs\nport: 8081").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.cache_size, 64);
        assert_eq!(config.port, 8081);
    }

    #[test]
    fn test_config_from_missing_file() {
        let result = Config::from_file("/definitely/not/here.yaml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
