//! Infrastructure implementation of the `SessionFactory` port.

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::application::ports::{InstallerSession, SessionFactory};
use crate::domain::{InstallerSpec, SessionError, Timeouts};
use crate::infra::session::SteamCmdSession;
use crate::infra::transport::SteamCmdTransport;

/// Starts a new steamcmd process for every session it hands out.
pub struct SteamCmdSessionFactory {
    installer: InstallerSpec,
    timeouts: Timeouts,
    principal: Option<String>,
}

impl SteamCmdSessionFactory {
    /// `principal` is the account every session logs in as; `None` or an
    /// empty name means anonymous.
    #[must_use]
    pub fn new(installer: InstallerSpec, timeouts: Timeouts, principal: Option<String>) -> Self {
        Self {
            installer,
            timeouts,
            principal: principal.filter(|p| !p.is_empty()),
        }
    }
}

impl SessionFactory for SteamCmdSessionFactory {
    type Session = SteamCmdSession<SteamCmdTransport>;

    async fn new_session(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Self::Session, SessionError> {
        let transport = SteamCmdTransport::start(&self.installer, &self.timeouts, cancel).await?;
        let mut session = SteamCmdSession::new(transport, self.timeouts, cancel.clone());

        if let Some(user) = &self.principal {
            if let Err(e) = session.login(user).await {
                if let Err(close_err) = session.close().await {
                    warn!(error = %close_err, "closing session after failed login");
                }
                return Err(e);
            }
        }
        Ok(session)
    }

    fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }
}
