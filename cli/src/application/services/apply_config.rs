//! Application service: provision one application config.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! The sequence is linear:
//! install dir → session → `force_install_dir` → login → `app_update` → mods → close.
//! Any failure stops the sequence. Nothing is rolled back: every step restates
//! the desired end state, so re-running the whole config is the recovery path.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::application::ports::{InstallerSession, LocalFs, ProgressReporter, SessionFactory};
use crate::domain::{ApplicationConfig, ApplyError, SessionError, Step};

/// Apply `config` end to end through a session from `factory`.
///
/// The session is closed on every path once it has been acquired. When a step
/// fails and closing fails too, the close error is logged and the step error
/// is returned.
///
/// # Errors
///
/// Returns an [`ApplyError`] naming the config and the step that failed.
pub async fn apply_config<F: SessionFactory>(
    config: &ApplicationConfig,
    factory: &F,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    cancel: &CancellationToken,
) -> Result<(), ApplyError> {
    let name = config.name.as_str();
    info!(config = name, app_id = config.id, "applying config");

    ensure_install_dir(config, fs)?;

    if cancel.is_cancelled() {
        return Err(step_error(
            config,
            Step::AcquireSession,
            SessionError::Cancelled {
                command: "start".to_string(),
            },
        ));
    }
    reporter.step(&format!("{name}: starting steamcmd..."));
    let mut session = factory
        .new_session(cancel)
        .await
        .map_err(|e| step_error(config, Step::AcquireSession, e))?;

    let outcome = run_steps(&mut session, config, factory.principal(), reporter).await;
    let closed = session.close().await;

    match (outcome, closed) {
        (Ok(()), Ok(())) => {
            reporter.success(&format!("{name}: installed"));
            Ok(())
        }
        (Ok(()), Err(e)) => Err(step_error(config, Step::CloseSession, e)),
        (Err(primary), Err(close_err)) => {
            warn!(config = name, error = %close_err, "closing session after failure");
            reporter.warn(&format!("{name}: could not stop steamcmd cleanly: {close_err}"));
            Err(primary)
        }
        (Err(primary), Ok(())) => Err(primary),
    }
}

/// Create the install dir when missing; an existing one is left alone.
fn ensure_install_dir(config: &ApplicationConfig, fs: &impl LocalFs) -> Result<(), ApplyError> {
    let dir = &config.install_dir;
    if fs.exists(dir) {
        debug!(config = %config.name, path = %dir.display(), "install dir exists");
        return Ok(());
    }
    info!(config = %config.name, path = %dir.display(), "creating install dir");
    fs.create_dir_all(dir).map_err(|e| ApplyError::InstallDir {
        config: config.name.clone(),
        path: dir.clone(),
        source: e.into(),
    })
}

async fn run_steps<S: InstallerSession>(
    session: &mut S,
    config: &ApplicationConfig,
    principal: Option<&str>,
    reporter: &impl ProgressReporter,
) -> Result<(), ApplyError> {
    let name = config.name.as_str();

    session
        .force_install_dir(&config.install_dir)
        .await
        .map_err(|e| step_error(config, Step::SetInstallDir, e))?;

    reporter.step(&format!("{name}: logging in..."));
    let login = match principal {
        Some(user) => session.login(user).await,
        None => session.login_anonymous().await,
    };
    login.map_err(|e| step_error(config, Step::Authenticate, e))?;

    reporter.step(&format!("{name}: updating app {}...", config.id));
    session
        .app_update(config.id, config.validate)
        .await
        .map_err(|e| step_error(config, Step::UpdateApplication, e))?;

    for &mod_id in &config.mods {
        reporter.step(&format!("{name}: installing mod {mod_id}..."));
        session
            .install_mod(config.id, mod_id)
            .await
            .map_err(|e| step_error(config, Step::InstallMod(mod_id), e))?;
    }

    Ok(())
}

fn step_error(config: &ApplicationConfig, step: Step, source: SessionError) -> ApplyError {
    ApplyError::Step {
        config: config.name.clone(),
        step,
        source,
    }
}
