//! Loads application configs from a directory of `*.json` files.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::domain::ApplicationConfig;

/// Read every `*.json` file in `dir`, in file-name order.
///
/// Subdirectories and files with any other extension are skipped. Relative
/// `install_dir` values are resolved against `base`.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed or a JSON file cannot
/// be read or parsed.
pub fn load_configs(dir: &Path, base: &Path) -> Result<Vec<ApplicationConfig>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("listing configs in {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("listing configs in {}", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            debug!(path = %path.display(), "skipping directory");
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            debug!(path = %path.display(), "skipping non-JSON file");
            continue;
        }
        files.push(path);
    }
    files.sort();

    files
        .iter()
        .map(|path| {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let mut config: ApplicationConfig = serde_json::from_str(&content)
                .with_context(|| format!("parsing config {}", path.display()))?;
            config.resolve_install_dir(base);
            debug!(path = %path.display(), name = %config.name, "loaded config");
            Ok(config)
        })
        .collect()
}
