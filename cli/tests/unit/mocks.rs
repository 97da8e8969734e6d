//! Shared mock infrastructure for unit tests.
//!
//! Sessions, the factory, and the filesystem all append to one [`Journal`],
//! so tests can assert on the relative order of installer commands and
//! filesystem changes.

#![allow(clippy::expect_used)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use steamgr_cli::application::ports::{
    InstallerSession, LocalFs, ProgressReporter, SessionFactory,
};
use steamgr_cli::domain::protocol;
use steamgr_cli::domain::{ApplicationConfig, SessionError};
use tokio_util::sync::CancellationToken;

// ── Journal ───────────────────────────────────────────────────────────────────

/// Ordered record of everything the mocks were asked to do.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().expect("lock").push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().expect("lock").clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.entries().iter().filter(|e| *e == entry).count()
    }

    pub fn clear(&self) {
        self.0.lock().expect("lock").clear();
    }
}

// ── Config helper ─────────────────────────────────────────────────────────────

pub fn config(id: u64, name: &str, install_dir: &str, mods: &[u64]) -> ApplicationConfig {
    ApplicationConfig {
        id,
        name: name.to_string(),
        validate: false,
        install_dir: PathBuf::from(install_dir),
        binary: "run.sh".to_string(),
        args: Vec::new(),
        mods: mods.to_vec(),
    }
}

// ── Mock: installer session ───────────────────────────────────────────────────

/// Session that records the command string for every call.
///
/// A call whose command starts with `fail_on` fails; a `fail_on` of `"close"`
/// makes `close` fail instead.
pub struct RecordingSession {
    journal: Journal,
    fail_on: Option<String>,
    fail_close: bool,
    closed: bool,
}

impl RecordingSession {
    fn run(&self, command: String) -> Result<(), SessionError> {
        self.journal.push(command.clone());
        match &self.fail_on {
            Some(prefix) if command.starts_with(prefix.as_str()) => {
                if command.starts_with("login") {
                    Err(SessionError::Auth {
                        reason: "FAILED login with result code Invalid Password".to_string(),
                    })
                } else {
                    Err(SessionError::Command {
                        command,
                        reason: "ERROR! simulated failure".to_string(),
                    })
                }
            }
            _ => Ok(()),
        }
    }
}

impl InstallerSession for RecordingSession {
    async fn login_anonymous(&mut self) -> Result<(), SessionError> {
        self.run(protocol::login_anonymous())
    }

    async fn login(&mut self, username: &str) -> Result<(), SessionError> {
        self.run(protocol::login(username))
    }

    async fn force_install_dir(&mut self, path: &Path) -> Result<(), SessionError> {
        self.run(protocol::force_install_dir(path))
    }

    async fn app_update(&mut self, app_id: u64, validate: bool) -> Result<(), SessionError> {
        self.run(protocol::app_update(app_id, validate))
    }

    async fn install_mod(&mut self, app_id: u64, mod_id: u64) -> Result<(), SessionError> {
        self.run(protocol::workshop_download_item(app_id, mod_id))
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.journal.push("close");
        if self.fail_close || self.fail_on.as_deref() == Some("close") {
            return Err(SessionError::Close {
                reason: "simulated kill failure".to_string(),
            });
        }
        Ok(())
    }
}

// ── Mock: session factory ─────────────────────────────────────────────────────

/// Factory handing out [`RecordingSession`]s that share its journal.
#[derive(Default)]
pub struct RecordingFactory {
    pub journal: Journal,
    pub fail_on: Option<String>,
    pub fail_start: bool,
    pub fail_close: bool,
    pub principal: Option<String>,
}

impl RecordingFactory {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            ..Self::default()
        }
    }

    pub fn failing_on(journal: &Journal, prefix: &str) -> Self {
        Self {
            fail_on: Some(prefix.to_string()),
            ..Self::new(journal)
        }
    }
}

impl SessionFactory for RecordingFactory {
    type Session = RecordingSession;

    async fn new_session(
        &self,
        _cancel: &CancellationToken,
    ) -> Result<Self::Session, SessionError> {
        self.journal.push("start");
        if self.fail_start {
            return Err(SessionError::Spawn {
                program: "steamcmd".to_string(),
                reason: "program not found".to_string(),
            });
        }
        Ok(RecordingSession {
            journal: self.journal.clone(),
            fail_on: self.fail_on.clone(),
            fail_close: self.fail_close,
            closed: false,
        })
    }

    fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }
}

// ── Mock: in-memory filesystem ────────────────────────────────────────────────

/// Filesystem keeping directories and files in memory.
#[derive(Default)]
pub struct MemoryFs {
    journal: Journal,
    dirs: Mutex<BTreeSet<PathBuf>>,
    files: Mutex<BTreeMap<PathBuf, String>>,
    fail_writes: bool,
}

impl MemoryFs {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            ..Self::default()
        }
    }

    pub fn with_dirs(journal: &Journal, dirs: &[&str]) -> Self {
        let fs = Self::new(journal);
        fs.dirs
            .lock()
            .expect("lock")
            .extend(dirs.iter().map(PathBuf::from));
        fs
    }

    pub fn failing_writes(journal: &Journal) -> Self {
        Self {
            fail_writes: true,
            ..Self::new(journal)
        }
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.files.lock().expect("lock").get(Path::new(path)).cloned()
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().expect("lock").len()
    }

    pub fn has_dir(&self, path: &str) -> bool {
        self.dirs.lock().expect("lock").contains(Path::new(path))
    }
}

impl LocalFs for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.dirs.lock().expect("lock").contains(path)
            || self.files.lock().expect("lock").contains_key(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.journal.push(format!("mkdir {}", path.display()));
        self.dirs.lock().expect("lock").insert(path.to_path_buf());
        Ok(())
    }

    fn write_atomic(&self, path: &Path, content: &str) -> Result<()> {
        if self.fail_writes {
            anyhow::bail!("disk full");
        }
        self.journal.push(format!("write {}", path.display()));
        self.files
            .lock()
            .expect("lock")
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

// ── Mock: progress reporter ───────────────────────────────────────────────────

pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

/// Reporter keeping every warning it was given.
#[derive(Default)]
pub struct RecordingReporter {
    pub warnings: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().expect("lock").clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, message: &str) {
        self.warnings.lock().expect("lock").push(message.to_string());
    }
}
