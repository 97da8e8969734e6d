//! steamcmd command session: implements `InstallerSession` over any
//! `ProcessTransport`.
//!
//! Builds the command strings, picks the timeout for each command, and turns
//! known failure phrases in the response into typed errors. Ordering of
//! operations is left to the caller; only a closed session refuses work.

use std::path::Path;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::application::ports::{InstallerSession, ProcessTransport};
use crate::domain::protocol;
use crate::domain::{SessionError, Timeouts};

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Authenticated,
    Closed,
}

/// Installer session bound to one transport for its whole life.
pub struct SteamCmdSession<T: ProcessTransport> {
    transport: T,
    timeouts: Timeouts,
    cancel: CancellationToken,
    state: SessionState,
}

impl<T: ProcessTransport> SteamCmdSession<T> {
    pub fn new(transport: T, timeouts: Timeouts, cancel: CancellationToken) -> Self {
        Self {
            transport,
            timeouts,
            cancel,
            state: SessionState::Created,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Send `command`, refusing if the session is closed or cancelled.
    async fn exec(&mut self, command: &str, timeout: Duration) -> Result<String, SessionError> {
        if self.state == SessionState::Closed {
            return Err(SessionError::Closed);
        }
        if self.cancel.is_cancelled() {
            return Err(SessionError::Cancelled {
                command: command.to_string(),
            });
        }
        self.transport.exec(command, timeout, &self.cancel).await
    }

    async fn login_with(&mut self, command: &str) -> Result<(), SessionError> {
        let timeout = self.timeouts.command;
        let response = self.exec(command, timeout).await?;
        if let Some(line) = protocol::auth_failure(&response) {
            return Err(SessionError::Auth {
                reason: line.to_string(),
            });
        }
        self.state = SessionState::Authenticated;
        info!("logged in");
        Ok(())
    }

    async fn run_checked(&mut self, command: &str, timeout: Duration) -> Result<(), SessionError> {
        let response = self.exec(command, timeout).await?;
        if let Some(line) = protocol::command_failure(&response) {
            return Err(SessionError::Command {
                command: command.to_string(),
                reason: line.to_string(),
            });
        }
        debug!(command, "command succeeded");
        Ok(())
    }
}

impl<T: ProcessTransport> InstallerSession for SteamCmdSession<T> {
    async fn login_anonymous(&mut self) -> Result<(), SessionError> {
        self.login_with(&protocol::login_anonymous()).await
    }

    async fn login(&mut self, username: &str) -> Result<(), SessionError> {
        self.login_with(&protocol::login(username)).await
    }

    async fn force_install_dir(&mut self, path: &Path) -> Result<(), SessionError> {
        let command = protocol::force_install_dir(path);
        let timeout = self.timeouts.command;
        self.run_checked(&command, timeout).await
    }

    async fn app_update(&mut self, app_id: u64, validate: bool) -> Result<(), SessionError> {
        let command = protocol::app_update(app_id, validate);
        let timeout = self.timeouts.update;
        self.run_checked(&command, timeout).await
    }

    async fn install_mod(&mut self, app_id: u64, mod_id: u64) -> Result<(), SessionError> {
        let command = protocol::workshop_download_item(app_id, mod_id);
        let timeout = self.timeouts.update;
        self.run_checked(&command, timeout).await
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.state = SessionState::Closed;
        self.transport.close().await
    }
}
