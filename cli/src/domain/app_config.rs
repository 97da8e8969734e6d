//! Per-application provisioning config, one JSON document per file.
//!
//! Pure types and validators only: no I/O, no async, no filesystem access.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

/// One deployable application: what to install, where, and how to launch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplicationConfig {
    /// Steam application identifier passed to `app_update`.
    pub id: u64,
    /// Unit name and unit description. Also names the generated `<name>.service`.
    pub name: String,
    /// Whether `app_update` also verifies installed files.
    #[serde(default)]
    pub validate: bool,
    /// Install directory; relative paths are resolved when configs are loaded.
    pub install_dir: PathBuf,
    /// Server binary, relative to `install_dir`.
    pub binary: String,
    /// Launch arguments, in order.
    #[serde(default)]
    pub args: Vec<String>,
    /// Workshop items installed after the application, in order.
    #[serde(default)]
    pub mods: Vec<u64>,
}

impl ApplicationConfig {
    /// Absolute path of the server binary.
    #[must_use]
    pub fn binary_path(&self) -> PathBuf {
        self.install_dir.join(&self.binary)
    }

    /// Resolve a relative `install_dir` against `base`. Absolute paths are kept.
    pub fn resolve_install_dir(&mut self, base: &Path) {
        if self.install_dir.is_relative() {
            self.install_dir = base.join(&self.install_dir);
        }
    }

    /// Check the fields that end up in file names and unit directives.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_unit_name(&self.name)?;
        if self.binary.trim().is_empty() {
            return Err(ConfigError::EmptyBinary);
        }
        if Path::new(&self.binary).is_absolute() {
            return Err(ConfigError::AbsoluteBinary(self.binary.clone()));
        }
        if self.install_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyInstallDir);
        }
        Ok(())
    }
}

/// Validates that `name` is usable both as a file name and a systemd unit name.
///
/// # Errors
///
/// Returns [`ConfigError::EmptyName`] or [`ConfigError::InvalidName`].
pub fn validate_unit_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::EmptyName);
    }
    let allowed = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '-'));
    if !allowed || name.starts_with('.') || name.starts_with('-') {
        return Err(ConfigError::InvalidName(name.to_string()));
    }
    Ok(())
}
