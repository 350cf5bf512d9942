//! Optional TOML configuration for the command-line tool.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::infrastructure::WireFormat;

/// Environment variable naming the config file when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "MONAS_KEYSET_CONFIG";

/// Defaults that command-line flags fall back to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeysetConfig {
    /// Format of input keysets
    #[serde(default)]
    pub in_format: WireFormat,

    /// Format of output keysets
    #[serde(default)]
    pub out_format: WireFormat,

    /// Template used by `create-keyset` when none is given
    #[serde(default = "default_key_template")]
    pub key_template: String,

    /// Log filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Context bound into the keyset encryption; must match on read and write
    #[serde(default)]
    pub associated_data: String,
}

impl Default for KeysetConfig {
    fn default() -> Self {
        Self {
            in_format: WireFormat::default(),
            out_format: WireFormat::default(),
            key_template: default_key_template(),
            log_level: default_log_level(),
            associated_data: String::new(),
        }
    }
}

fn default_key_template() -> String {
    "AES128_GCM".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl KeysetConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Loads `explicit`, else the file named by [`CONFIG_ENV_VAR`], else the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {reason}", .path.display())]
    Io { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    Parse(String),
}
