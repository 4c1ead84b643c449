//! Configuration file handling for the CLI.
//!
//! Settings live in `$XDG_CONFIG_HOME/domwatch/config.toml`; the session token
//! and the local user registry live in `state.json` under the data directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use domwatch_business::{BusinessConfig, DashboardFeatures};
use serde::{Deserialize, Serialize};

/// CLI configuration stored on disk
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub features: DashboardFeatures,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API origin, e.g. `https://watch.example.com`
    pub base_url: Option<String>,
    /// Origin serving screenshot files
    pub media_base_url: Option<String>,
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "domwatch", "domwatch")
        .context("Failed to determine home directory")
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Location of the persisted session and user registry.
    pub fn state_path() -> Result<PathBuf> {
        Ok(project_dirs()?.data_dir().join("state.json"))
    }

    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, falling back to defaults when the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Business configuration with the file's values over the built-in defaults.
    pub fn business_config(&self) -> BusinessConfig {
        let mut config = BusinessConfig::default();
        if let Some(url) = &self.api.base_url {
            config.api_base_url.clone_from(url);
        }
        if let Some(url) = &self.api.media_base_url {
            config.media_base_url.clone_from(url);
        }
        config.features = self.features;
        config
    }
}
