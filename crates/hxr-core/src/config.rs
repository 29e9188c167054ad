use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::retry::RetrySettings;
use crate::session::SessionConfig;

/// One `[sessions.<alias>]` entry: connection settings plus an optional retry override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSection {
    #[serde(flatten)]
    pub session: SessionConfig,
    /// Per-session retry policy; if missing, the global `[retry]` section applies.
    #[serde(default)]
    pub retry: Option<RetrySettings>,
}

/// Configuration loaded from `~/.config/hxr/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HxrConfig {
    /// Global retry policy; missing fields use library defaults.
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub sessions: BTreeMap<String, SessionSection>,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hxr")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HxrConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = HxrConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<HxrConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: HxrConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
