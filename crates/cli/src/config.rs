use std::{
    fs, io,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use ironlog_storage::BASE_URL;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::output::OutputFormat;

pub const API_KEY_VAR: &str = "IRONLOG_API_KEY";
pub const BASE_URL_VAR: &str = "IRONLOG_BASE_URL";
pub const OUTPUT_FORMAT_VAR: &str = "IRONLOG_OUTPUT_FORMAT";
pub const NO_COLOR_VAR: &str = "NO_COLOR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no configuration directory found, use --config <PATH>")]
    NoConfigDir,
    #[error("API key not configured, run `ironlog config init --api-key <KEY>` or set IRONLOG_API_KEY")]
    MissingApiKey,
    #[error("invalid output format: {0} (expected json, table or plain)")]
    InvalidOutputFormat(String),
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: None,
            base_url: BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub output_format: OutputFormat,
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::default(),
            color: true,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("ironlog").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Read the configuration file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("{} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the configuration file, readable by the owner only.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source: io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, toml::to_string_pretty(self)?).map_err(io_error)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(io_error)?;
        }

        debug!("configuration written to {}", path.display());
        Ok(())
    }

    /// Override file values by environment variables.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let var = |name: &str| var(name).filter(|value: &String| !value.trim().is_empty());

        if let Some(key) = var(API_KEY_VAR) {
            self.api.key = Some(key);
        }
        if let Some(base_url) = var(BASE_URL_VAR) {
            self.api.base_url = base_url;
        }
        if let Some(format) = var(OUTPUT_FORMAT_VAR) {
            self.display.output_format = OutputFormat::from_str(&format, true)
                .map_err(|_| ConfigError::InvalidOutputFormat(format))?;
        }
        if var(NO_COLOR_VAR).is_some() {
            self.display.color = false;
        }

        Ok(())
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api
            .key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// API key with everything but the first and last four characters hidden.
    #[must_use]
    pub fn masked_key(&self) -> String {
        match self.api_key() {
            Err(_) => String::from("(not set)"),
            Ok(key) => {
                let chars = key.chars().collect::<Vec<_>>();
                if chars.len() <= 8 {
                    return "*".repeat(chars.len());
                }
                let head = chars[..4].iter().collect::<String>();
                let tail = chars[chars.len() - 4..].iter().collect::<String>();
                format!("{head}****{tail}")
            }
        }
    }
}
