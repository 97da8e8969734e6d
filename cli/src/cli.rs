//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::warn;

use crate::app::{AppContext, AppFlags};
use crate::commands;
use crate::infra::config::YamlSettingsStore;
use crate::logging::LogFormat;

/// Provision dedicated game servers with steamcmd and systemd
#[derive(Parser)]
#[command(
    name = "steamgr",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Install every configured application and write its systemd unit
    Apply(commands::apply::ApplyArgs),

    /// Check that steamcmd starts and the login works
    Check(commands::check::CheckArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if settings cannot be loaded or the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            quiet,
            no_color,
            command,
            ..
        } = self;

        if matches!(command, Command::Version) {
            commands::version::run();
            return Ok(());
        }

        let app = AppContext::new(&AppFlags { no_color, quiet }, &YamlSettingsStore)?;
        let cancel = app.cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, stopping the installer");
                cancel.cancel();
            }
        });

        match command {
            Command::Apply(args) => commands::apply::run(&args, &app).await,
            Command::Check(args) => commands::check::run(&args, &app).await,
            Command::Version => Ok(()),
        }
    }
}
