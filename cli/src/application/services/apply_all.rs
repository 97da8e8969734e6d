//! Application service: provision a batch of configs and emit their units.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//!
//! Configs run with bounded concurrency, each with its own session and
//! therefore its own installer process. The first failure ends the run:
//! in-flight siblings are dropped, which kills their processes.
//! Configs applied concurrently must not share an install dir; that is the
//! caller's responsibility and is not checked here.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures_util::stream::{self, StreamExt, TryStreamExt};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::application::ports::{LocalFs, ProgressReporter, SessionFactory};
use crate::application::services::apply_config::apply_config;
use crate::domain::unit_file::{self, ServiceAccount};
use crate::domain::ApplicationConfig;

/// Inputs shared by every config in the batch.
pub struct ApplyAllOptions<'a> {
    /// Directory receiving `<name>.service` files.
    pub output_dir: &'a Path,
    /// `User=` / `Group=` for every unit.
    pub account: &'a ServiceAccount,
    /// Maximum number of configs provisioned at once (at least 1).
    pub jobs: usize,
}

/// Result of a fully successful batch.
#[derive(Debug, Default)]
pub struct ApplySummary {
    /// Unit files written, in config order.
    pub units: Vec<PathBuf>,
}

/// Validate every config, then provision them and write their unit files.
///
/// Two configs with the same name write the same unit file; the later one wins.
///
/// # Errors
///
/// Returns the first validation error before anything is provisioned, or the
/// first provisioning/write error after which no further config is started.
pub async fn apply_all<F: SessionFactory>(
    configs: &[ApplicationConfig],
    factory: &F,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    opts: &ApplyAllOptions<'_>,
    cancel: &CancellationToken,
) -> Result<ApplySummary> {
    for config in configs {
        config
            .validate()
            .with_context(|| format!("invalid config '{}'", config.name))?;
    }

    if !fs.exists(opts.output_dir) {
        fs.create_dir_all(opts.output_dir)
            .context("creating unit output dir")?;
    }

    let units = stream::iter(
        configs
            .iter()
            .map(|config| provision_one(config, factory, fs, reporter, opts, cancel)),
    )
    .buffered(opts.jobs.max(1))
    .try_collect::<Vec<PathBuf>>()
    .await?;

    info!(count = units.len(), "all configs applied");
    Ok(ApplySummary { units })
}

async fn provision_one<F: SessionFactory>(
    config: &ApplicationConfig,
    factory: &F,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    opts: &ApplyAllOptions<'_>,
    cancel: &CancellationToken,
) -> Result<PathBuf> {
    apply_config(config, factory, fs, reporter, cancel).await?;

    let unit = unit_file::render(config, opts.account);
    let path = opts.output_dir.join(unit_file::unit_file_name(config));
    fs.write_atomic(&path, &unit)
        .with_context(|| format!("writing unit file for '{}'", config.name))?;
    info!(config = %config.name, path = %path.display(), "unit file written");
    reporter.success(&format!("{}: wrote {}", config.name, path.display()));
    Ok(path)
}
