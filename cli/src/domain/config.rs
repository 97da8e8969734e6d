//! Domain types for steamgr settings (`~/.steamgr/config.yaml`).
//!
//! Pure types only: no I/O, no async, no filesystem access.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

/// Top-level settings. Every section falls back to built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// How to launch the installer.
    pub installer: InstallerSpec,
    /// Bounded waits for installer interaction.
    pub timeouts: TimeoutSettings,
    /// Account for generated units.
    pub service: ServiceSettings,
}

/// Program and leading arguments used to start the installer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InstallerSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for InstallerSpec {
    fn default() -> Self {
        Self {
            program: "steamcmd".to_string(),
            args: Vec::new(),
        }
    }
}

impl Settings {
    /// Reject values that would make every installer interaction fail.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] naming the first zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timeouts.validate()
    }
}

/// Timeouts in seconds, as written in the settings file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeoutSettings {
    /// Wait for the first prompt after launch (steamcmd updates itself first).
    pub startup: u64,
    /// Wait for short commands: login, install dir.
    pub command: u64,
    /// Wait for downloads: `app_update` and workshop items.
    pub update: u64,
    /// Wait for exit after `quit` before killing the process.
    pub close_grace: u64,
}

impl TimeoutSettings {
    /// Every timeout must be at least one second.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] naming the first zero field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("startup", self.startup),
            ("command", self.command),
            ("update", self.update),
            ("close_grace", self.close_grace),
        ];
        match fields.into_iter().find(|(_, secs)| *secs == 0) {
            Some((name, _)) => Err(ConfigError::ZeroTimeout(name)),
            None => Ok(()),
        }
    }
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            startup: 300,
            command: 120,
            update: 7200,
            close_grace: 10,
        }
    }
}

/// Resolved timeouts used by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub startup: Duration,
    pub command: Duration,
    pub update: Duration,
    pub close_grace: Duration,
}

impl From<TimeoutSettings> for Timeouts {
    fn from(s: TimeoutSettings) -> Self {
        Self {
            startup: Duration::from_secs(s.startup),
            command: Duration::from_secs(s.command),
            update: Duration::from_secs(s.update),
            close_grace: Duration::from_secs(s.close_grace),
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        TimeoutSettings::default().into()
    }
}

/// Optional overrides for the `User=` / `Group=` directives.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}
