//! Helpers for launching `tests/fixtures/fake_steamcmd.sh`.

#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use steamgr_cli::domain::{InstallerSpec, Timeouts};

pub fn script() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("fake_steamcmd.sh")
}

/// Installer spec running the fake through `env` so each test gets its own
/// variables without touching the test process environment.
pub fn installer(vars: &[(&str, &str)]) -> InstallerSpec {
    let mut args: Vec<String> = vars.iter().map(|(k, v)| format!("{k}={v}")).collect();
    args.push("sh".to_string());
    args.push(script().display().to_string());
    InstallerSpec {
        program: "env".to_string(),
        args,
    }
}

pub fn short_timeouts() -> Timeouts {
    Timeouts {
        startup: Duration::from_secs(10),
        command: Duration::from_secs(5),
        update: Duration::from_secs(5),
        close_grace: Duration::from_secs(2),
    }
}

/// Commands the fake received, one per line.
pub fn received(log: &Path) -> Vec<String> {
    std::fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
