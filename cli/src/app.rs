//! Application context — unified state passed to every command handler.
//!
//! `AppContext` carries the terminal output context, the loaded settings, and
//! the cancellation token raised on Ctrl-C.

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::application::ports::SettingsStore;
use crate::domain::{InstallerSpec, ServiceAccount, Settings};
use crate::infra::session_factory::SteamCmdSessionFactory;
use crate::output::{OutputContext, TerminalReporter};

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Settings loaded from the settings file, or defaults.
    pub settings: Settings,
    /// Raised when the run should stop issuing installer commands.
    pub cancel: CancellationToken,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but cannot be parsed.
    pub fn new(flags: &AppFlags, store: &impl SettingsStore) -> Result<Self> {
        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            settings: store.load()?,
            cancel: CancellationToken::new(),
        })
    }

    /// Progress reporter writing to this context's terminal.
    #[must_use]
    pub fn terminal_reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Session factory for the configured installer, with an optional
    /// program override from the command line.
    #[must_use]
    pub fn session_factory(
        &self,
        installer: Option<&str>,
        principal: Option<String>,
    ) -> SteamCmdSessionFactory {
        let spec = match installer {
            Some(program) => InstallerSpec {
                program: program.to_string(),
                args: Vec::new(),
            },
            None => self.settings.installer.clone(),
        };
        SteamCmdSessionFactory::new(spec, self.settings.timeouts.into(), principal)
    }

    /// Account for generated units: flags, then settings, then `$USER`.
    #[must_use]
    pub fn service_account(&self, user: Option<&str>, group: Option<&str>) -> ServiceAccount {
        resolve_service_account(
            &self.settings,
            user,
            group,
            std::env::var("USER").ok().as_deref(),
        )
    }
}

/// Pick `User=`/`Group=`. The group falls back to the chosen user's name.
#[must_use]
pub fn resolve_service_account(
    settings: &Settings,
    user: Option<&str>,
    group: Option<&str>,
    env_user: Option<&str>,
) -> ServiceAccount {
    let user = user
        .or(settings.service.user.as_deref())
        .or(env_user.filter(|u| !u.is_empty()))
        .unwrap_or("root")
        .to_string();
    let group = group
        .or(settings.service.group.as_deref())
        .map_or_else(|| user.clone(), str::to_string);
    ServiceAccount { user, group }
}
