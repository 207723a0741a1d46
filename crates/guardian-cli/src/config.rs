//! CLI configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Console server URL (e.g., http://localhost:3000).
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Output format.
    #[serde(default)]
    pub output_format: OutputFormat,
}

/// Default server URL.
fn default_server_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            output_format: OutputFormat::default(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from file.
    pub fn load() -> crate::CliResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads configuration from a specific file, defaulting when absent.
    pub fn load_from(path: &std::path::Path) -> crate::CliResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content).map_err(|e| {
                crate::CliError::Config(format!("failed to parse config: {e}"))
            })?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves configuration to file.
    pub fn save(&self) -> crate::CliResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves configuration to a specific file.
    pub fn save_to(&self, path: &std::path::Path) -> crate::CliResult<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            crate::CliError::Config(format!("failed to serialize config: {e}"))
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Gets the configuration file path.
    pub fn config_path() -> crate::CliResult<PathBuf> {
        let home = dirs_next::home_dir().ok_or_else(|| {
            crate::CliError::Config("could not determine home directory".to_string())
        })?;
        Ok(home.join(".keycloak-guardian").join("guardian.toml"))
    }

    /// Sets a value by key.
    pub fn set(&mut self, key: &str, value: &str) -> crate::CliResult<()> {
        match key {
            "server_url" | "server" => {
                self.server_url = value.trim_end_matches('/').to_string();
            }
            "output_format" | "output" => {
                self.output_format = value.parse()?;
            }
            _ => {
                return Err(crate::CliError::InvalidArgument(format!(
                    "Unknown configuration key: {key}. Known keys: server_url, output_format"
                )));
            }
        }
        Ok(())
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
    /// YAML format.
    Yaml,
    /// Quiet (minimal output).
    Quiet,
}

impl std::str::FromStr for OutputFormat {
    type Err = crate::CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            "quiet" => Ok(Self::Quiet),
            _ => Err(crate::CliError::InvalidArgument(format!(
                "Unknown output format: {s}. Supported: table, json, yaml, quiet"
            ))),
        }
    }
}
