//! `steamgr apply`: install configured applications and write their units.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::apply_all::{ApplyAllOptions, apply_all};
use crate::infra::config_dir::load_configs;
use crate::infra::fs::LocalFs;

/// Arguments for the apply command.
#[derive(Args)]
pub struct ApplyArgs {
    /// Directory holding one JSON config per application
    #[arg(default_value = ".")]
    pub configs_dir: PathBuf,

    /// Directory to write generated systemd units to
    #[arg(short, long, default_value = "./systemd", env = "STEAMGR_SYSTEMD_DIR")]
    pub systemd: PathBuf,

    /// Steam account to log in as (anonymous when omitted)
    #[arg(short, long, env = "STEAMGR_USERNAME")]
    pub username: Option<String>,

    /// Number of configs to provision at once
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: u16,

    /// steamcmd executable (overrides the settings file)
    #[arg(long)]
    pub installer: Option<String>,

    /// User for generated units
    #[arg(long)]
    pub service_user: Option<String>,

    /// Group for generated units (defaults to the user)
    #[arg(long)]
    pub service_group: Option<String>,
}

/// Run `steamgr apply`.
///
/// Stops at the first config that fails; no later config is started.
///
/// # Errors
///
/// Returns an error if configs cannot be loaded, any config fails to apply,
/// or a unit file cannot be written.
pub async fn run(args: &ApplyArgs, app: &AppContext) -> Result<()> {
    let cwd = std::env::current_dir().context("resolving current directory")?;
    let configs = load_configs(&args.configs_dir, &cwd)?;
    if configs.is_empty() {
        app.output.warn(&format!(
            "no configs found in {}",
            args.configs_dir.display()
        ));
        return Ok(());
    }

    let factory = app.session_factory(args.installer.as_deref(), args.username.clone());
    let account = app.service_account(args.service_user.as_deref(), args.service_group.as_deref());
    let reporter = app.terminal_reporter();
    let opts = ApplyAllOptions {
        output_dir: &args.systemd,
        account: &account,
        jobs: usize::from(args.jobs),
    };

    let summary = apply_all(&configs, &factory, &LocalFs, &reporter, &opts, &app.cancel).await?;

    app.output
        .success(&format!("{} unit file(s) written", summary.units.len()));
    app.output.kv("Units", &args.systemd.display().to_string());
    app.output
        .info("copy them to /etc/systemd/system and run `systemctl daemon-reload`");
    Ok(())
}
