//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::domain::{SessionError, Settings};

// ── Installer Ports ───────────────────────────────────────────────────────────

/// Line-oriented request/response exchange with one installer process.
///
/// Implementations own the process for their whole lifetime. Only one command
/// is in flight at a time, which `&mut self` enforces.
#[allow(async_fn_in_trait)]
pub trait ProcessTransport {
    /// Send `command` and return everything printed before the next prompt.
    ///
    /// # Errors
    ///
    /// `Write`/`Read` on pipe failures, `ProcessExited` on EOF, `Timeout` when
    /// no prompt arrives within `timeout`, `Cancelled` when `cancel` fires.
    async fn exec(
        &mut self,
        command: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<String, SessionError>;

    /// Ask the process to quit, killing it after a grace period.
    /// Calling `close` again after it returned is a no-op.
    async fn close(&mut self) -> Result<(), SessionError>;
}

/// Named installer operations on top of a [`ProcessTransport`].
#[allow(async_fn_in_trait)]
pub trait InstallerSession {
    /// Log in without an account.
    async fn login_anonymous(&mut self) -> Result<(), SessionError>;
    /// Log in as `username` using the installer's cached credentials.
    async fn login(&mut self, username: &str) -> Result<(), SessionError>;
    /// Point subsequent installs at `path`. The path is sent verbatim.
    async fn force_install_dir(&mut self, path: &Path) -> Result<(), SessionError>;
    /// Install or update `app_id`, optionally verifying files.
    async fn app_update(&mut self, app_id: u64, validate: bool) -> Result<(), SessionError>;
    /// Download workshop item `mod_id` for `app_id`.
    async fn install_mod(&mut self, app_id: u64, mod_id: u64) -> Result<(), SessionError>;
    /// End the session and release the process.
    async fn close(&mut self) -> Result<(), SessionError>;
}

/// Produces one fresh [`InstallerSession`] per provisioning run.
#[allow(async_fn_in_trait)]
pub trait SessionFactory {
    type Session: InstallerSession;

    /// Start a session, logging in up front when a principal is configured.
    async fn new_session(&self, cancel: &CancellationToken)
    -> Result<Self::Session, SessionError>;

    /// Account used for every session, or `None` for anonymous login.
    fn principal(&self) -> Option<&str>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── State and Filesystem Ports ────────────────────────────────────────────────

/// Raw filesystem operations used by the services.
pub trait LocalFs {
    /// Whether `path` exists.
    fn exists(&self, path: &Path) -> bool;
    /// Create `path` and any missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Replace the contents of `path` in one step.
    fn write_atomic(&self, path: &Path, content: &str) -> Result<()>;
}

/// Loads steamgr settings.
pub trait SettingsStore {
    /// Load settings, returning defaults when no settings file exists.
    fn load(&self) -> Result<Settings>;
    /// Location of the settings file.
    fn path(&self) -> Result<PathBuf>;
}
