use anyhow::{Context, Result};
use campus_access::AccessConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Academy dataset (JSON); the sample academy is used when unset
    pub data_file: Option<PathBuf>,
    pub access: AccessConfig,
}

impl CliConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn resolve_config(cli_config: Option<PathBuf>, cli_data: Option<PathBuf>) -> Result<Self> {
        Self::resolve_with(cli_config, cli_data, |key| std::env::var(key).ok())
    }

    /// `--config` beats `$CAMPUS_CONFIG` beats defaults; `--data` beats `$CAMPUS_DATA` beats the file
    pub fn resolve_with<F>(cli_config: Option<PathBuf>, cli_data: Option<PathBuf>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if let Some(config_path) = cli_config {
            Self::load_from_file(config_path)?
        } else if let Some(env_config) = lookup("CAMPUS_CONFIG") {
            Self::load_from_file(env_config)?
        } else {
            Self {
                data_file: None,
                access: AccessConfig::from_lookup(&lookup),
            }
        };

        if let Some(data) = cli_data {
            config.data_file = Some(data);
        } else if let Some(env_data) = lookup("CAMPUS_DATA") {
            config.data_file = Some(PathBuf::from(env_data));
        }

        Ok(config)
    }
}
