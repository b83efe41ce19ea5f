//! User configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "tasklist";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_table")]
    pub table: String,

    /// Unset means the HTTP client's own behavior (no request timeout).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            table: default_table(),
            timeout_secs: None,
        }
    }
}

fn default_table() -> String {
    "tasks".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default)]
    pub name: String,
}

/// Command-line or environment values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct StoreOverrides {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub table: Option<String>,
}

impl StoreConfig {
    pub fn apply(&mut self, overrides: &StoreOverrides) {
        if let Some(url) = &overrides.url {
            self.url = Some(url.clone());
        }
        if let Some(key) = &overrides.api_key {
            self.api_key = Some(key.clone());
        }
        if let Some(table) = &overrides.table {
            self.table = table.clone();
        }
    }
}

/// `$XDG_CONFIG_HOME/tasklist` on Linux, `~/.tasklist` elsewhere.
pub fn get_app_dir() -> Result<PathBuf> {
    #[cfg(target_os = "linux")]
    let dir = dirs::config_dir()
        .context("Cannot find config directory")?
        .join(APP_NAME);

    #[cfg(not(target_os = "linux"))]
    let dir = dirs::home_dir()
        .context("Cannot find home directory")?
        .join(format!(".{}", APP_NAME));

    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(get_app_dir()?.join("config.toml"))
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }
}
