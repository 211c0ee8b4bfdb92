//! Configuration management for hashledger

use crate::error::{ChainError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub nodes: NodesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LedgerConfig {
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
    #[serde(default)]
    pub allow_blank_payloads: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: default_max_payload_bytes(),
            allow_blank_payloads: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodesConfig {
    #[serde(default = "default_node_count")]
    pub count: usize,
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,
}

impl Default for NodesConfig {
    fn default() -> Self {
        Self {
            count: default_node_count(),
            name_prefix: default_name_prefix(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_max_payload_bytes() -> usize {
    1024 * 1024
}

fn default_node_count() -> usize {
    3
}

fn default_name_prefix() -> String {
    "node".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Config {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Config = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ledger.max_payload_bytes == 0 {
            return Err(ChainError::ConfigError(
                "ledger.max_payload_bytes must be greater than zero".to_string(),
            ));
        }
        if self.nodes.count == 0 {
            return Err(ChainError::ConfigError(
                "nodes.count must be at least 1".to_string(),
            ));
        }
        if self.nodes.name_prefix.trim().is_empty() {
            return Err(ChainError::ConfigError(
                "nodes.name_prefix must be set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load `config.toml` from the working directory, falling back to defaults when absent.
pub fn load_config() -> Result<Config> {
    load_config_from(DEFAULT_CONFIG_PATH)
}

pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Config::default());
    }
    let config_str = fs::read_to_string(path)?;
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    Config::from_toml_str(&config_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.ledger.max_payload_bytes, 1024 * 1024);
        assert!(!config.ledger.allow_blank_payloads);
        assert_eq!(config.nodes.count, 3);
        assert_eq!(config.nodes.name_prefix, "node");
        assert_eq!(config.logging.filter, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = Config::from_toml_str("[nodes]\ncount = 5\n").unwrap();
        assert_eq!(config.nodes.count, 5);
        assert_eq!(config.nodes.name_prefix, "node");
        assert_eq!(config.ledger, LedgerConfig::default());
    }

    #[test]
    fn test_rejects_zero_nodes() {
        let err = Config::from_toml_str("[nodes]\ncount = 0\n").unwrap_err();
        assert!(matches!(err, ChainError::ConfigError(_)));
    }

    #[test]
    fn test_rejects_zero_payload_limit() {
        let err = Config::from_toml_str("[ledger]\nmax_payload_bytes = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_payload_bytes"));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = Config::from_toml_str("[ledger\n").unwrap_err();
        assert!(matches!(err, ChainError::ConfigError(_)));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.nodes.count, 3);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[ledger]\nmax_payload_bytes = 64\nallow_blank_payloads = true\n\n[logging]\nfilter = \"debug\""
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.ledger.max_payload_bytes, 64);
        assert!(config.ledger.allow_blank_payloads);
        assert_eq!(config.logging.filter, "debug");
    }
}
