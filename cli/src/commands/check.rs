//! `steamgr check`: verify steamcmd starts and accepts the login.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::check_installer::check_installer;

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Steam account to log in as (anonymous when omitted)
    #[arg(short, long, env = "STEAMGR_USERNAME")]
    pub username: Option<String>,

    /// steamcmd executable (overrides the settings file)
    #[arg(long)]
    pub installer: Option<String>,
}

/// Run `steamgr check`.
///
/// # Errors
///
/// Returns an error if steamcmd cannot be started, the login is rejected,
/// or the process cannot be stopped.
pub async fn run(args: &CheckArgs, app: &AppContext) -> Result<()> {
    let factory = app.session_factory(args.installer.as_deref(), args.username.clone());
    check_installer(&factory, &app.terminal_reporter(), &app.cancel).await
}
