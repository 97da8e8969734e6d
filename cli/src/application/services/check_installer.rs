//! Application service: smoke-test the installer: start, log in, quit.

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::application::ports::{InstallerSession, ProgressReporter, SessionFactory};

/// Start a session, authenticate, and close it again.
///
/// # Errors
///
/// Returns an error if the installer cannot be started, rejects the login,
/// or cannot be stopped.
pub async fn check_installer<F: SessionFactory>(
    factory: &F,
    reporter: &impl ProgressReporter,
    cancel: &CancellationToken,
) -> Result<()> {
    reporter.step("starting steamcmd...");
    let mut session = factory
        .new_session(cancel)
        .await
        .context("starting installer session")?;

    reporter.step("logging in...");
    let login = match factory.principal() {
        Some(user) => session.login(user).await,
        None => session.login_anonymous().await,
    };

    let closed = session.close().await;
    if let Err(e) = login {
        if let Err(close_err) = closed {
            warn!(error = %close_err, "closing session after failed login");
            reporter.warn(&format!("could not stop steamcmd cleanly: {close_err}"));
        }
        return Err(e).context("logging in");
    }
    closed.context("closing installer session")?;

    reporter.success("steamcmd is reachable and login works");
    Ok(())
}
