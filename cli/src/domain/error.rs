//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

// ── Session errors ────────────────────────────────────────────────────────────

/// Errors raised by the installer transport and the command session on top of it.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to start installer '{program}': {reason}")]
    Spawn { program: String, reason: String },

    #[error("failed to write '{command}' to installer")]
    Write {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read installer output")]
    Read {
        #[source]
        source: std::io::Error,
    },

    #[error("installer exited while running '{command}'")]
    ProcessExited { command: String },

    #[error("installer did not finish '{command}' within {}s", .after.as_secs())]
    Timeout { command: String, after: Duration },

    #[error("login rejected: {reason}")]
    Auth { reason: String },

    #[error("'{command}' failed: {reason}")]
    Command { command: String, reason: String },

    #[error("failed to stop installer: {reason}")]
    Close { reason: String },

    #[error("session is closed")]
    Closed,

    #[error("cancelled before '{command}' completed")]
    Cancelled { command: String },
}

// ── Apply errors ──────────────────────────────────────────────────────────────

/// One step of the per-config provisioning sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    EnsureInstallDir,
    AcquireSession,
    SetInstallDir,
    Authenticate,
    UpdateApplication,
    InstallMod(u64),
    CloseSession,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnsureInstallDir => f.write_str("creating install dir"),
            Self::AcquireSession => f.write_str("starting installer session"),
            Self::SetInstallDir => f.write_str("setting install dir"),
            Self::Authenticate => f.write_str("logging in"),
            Self::UpdateApplication => f.write_str("updating application"),
            Self::InstallMod(id) => write!(f, "installing mod {id}"),
            Self::CloseSession => f.write_str("closing installer session"),
        }
    }
}

/// Failure of one config's provisioning sequence, tagged with where it happened.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("config '{config}': {step} failed")]
    Step {
        config: String,
        step: Step,
        #[source]
        source: SessionError,
    },

    #[error("config '{config}': creating install dir {}", .path.display())]
    InstallDir {
        config: String,
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplyError {
    /// The step at which the sequence stopped.
    #[must_use]
    pub fn step(&self) -> Step {
        match self {
            Self::Step { step, .. } => *step,
            Self::InstallDir { .. } => Step::EnsureInstallDir,
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to application config validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("invalid name '{0}': use letters, digits, '_', '.', '@' or '-', not starting with '.' or '-'")]
    InvalidName(String),

    #[error("binary must not be empty")]
    EmptyBinary,

    #[error("binary '{0}' must be relative to install_dir")]
    AbsoluteBinary(String),

    #[error("install_dir must not be empty")]
    EmptyInstallDir,

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}
