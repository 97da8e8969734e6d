//! Infrastructure implementation of the `SettingsStore` port.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::application::ports::SettingsStore;
use crate::domain::config::Settings;

/// Production implementation of `SettingsStore` that reads a YAML file on disk.
pub struct YamlSettingsStore;

impl SettingsStore for YamlSettingsStore {
    fn load(&self) -> Result<Settings> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(Settings::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        parse_settings(&content, &path)
    }

    fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var("STEAMGR_CONFIG") {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".steamgr").join("config.yaml"))
    }
}

/// Parse and validate the settings file contents read from `path`.
fn parse_settings(content: &str, path: &Path) -> Result<Settings> {
    let settings: Settings = serde_yaml::from_str(content)
        .with_context(|| format!("cannot parse {}", path.display()))?;
    settings
        .validate()
        .with_context(|| format!("invalid settings in {}", path.display()))?;
    Ok(settings)
}
