//! steamcmd console protocol: command strings, prompt detection, failure phrases.
//!
//! steamcmd is driven over its standard streams: one newline-terminated command
//! in, free-form text out, followed by the `Steam>` prompt once it is idle.
//! The prompt is printed without a trailing newline, so completion is detected
//! on the raw byte stream rather than per line.
//!
//! Everything here is pure so it can be exercised against captured transcripts.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// Prompt printed by steamcmd when it is ready for the next command.
pub const PROMPT: &str = "Steam>";

/// Command sent to end the session.
pub const QUIT: &str = "quit";

/// Phrases in a `login` response that mean the login did not go through.
pub const AUTH_FAILURES: &[&str] = &[
    "FAILED",
    "Login Failure",
    "Rate Limit Exceeded",
    "Invalid Password",
    "Account Logon Denied",
    "Two-factor code mismatch",
    "No Connection",
];

/// Phrases in any other response that mean the command failed.
pub const COMMAND_FAILURES: &[&str] = &[
    "ERROR!",
    "Error!",
    "FAILED",
    "Failed to install app",
];

/// Workshop download failures: a line containing both parts, in any position.
pub const DOWNLOAD_FAILURE: (&str, &str) = ("Download item", "failed");

/// Longest unterminated escape held back between chunks.
const MAX_PENDING_ESCAPE: usize = 16;

static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // compile-time constant pattern
    Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("valid ANSI regex")
});

// ── Command strings ───────────────────────────────────────────────────────────

#[must_use]
pub fn login_anonymous() -> String {
    "login anonymous".to_string()
}

#[must_use]
pub fn login(username: &str) -> String {
    format!("login {username}")
}

#[must_use]
pub fn force_install_dir(path: &Path) -> String {
    format!("force_install_dir {}", path.display())
}

#[must_use]
pub fn app_update(app_id: u64, validate: bool) -> String {
    if validate {
        format!("app_update {app_id} validate")
    } else {
        format!("app_update {app_id}")
    }
}

#[must_use]
pub fn workshop_download_item(app_id: u64, mod_id: u64) -> String {
    format!("workshop_download_item {app_id} {mod_id}")
}

// ── Prompt detection ──────────────────────────────────────────────────────────

/// Remove terminal colour/cursor escape sequences.
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

/// Accumulates installer output until the prompt shows up.
///
/// Feed raw chunks as they are read; once [`is_complete`](Self::is_complete)
/// returns `true`, [`finish`](Self::finish) yields the response text without
/// the trailing prompt.
///
/// Each chunk is decoded and ANSI-stripped once. A UTF-8 character or escape
/// sequence cut off at the end of a chunk is held back until the next one.
#[derive(Debug, Default)]
pub struct ResponseScanner {
    pending: Vec<u8>,
    text: String,
}

impl ResponseScanner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk read from the installer's stdout.
    pub fn feed(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
        let ready = match std::str::from_utf8(&self.pending) {
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            _ => self.pending.len(),
        };
        let decoded = String::from_utf8_lossy(&self.pending[..ready]).into_owned();
        let keep_from = unfinished_escape(&decoded).unwrap_or(decoded.len());
        self.text.push_str(&strip_ansi(&decoded[..keep_from]));

        // The held-back escape is ASCII, so its length is the same in bytes.
        let held = decoded.len() - keep_from;
        self.pending.drain(..ready - held);
    }

    /// Whether the output seen so far ends at an idle prompt.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty() && self.text.trim_end().ends_with(PROMPT)
    }

    /// Everything captured so far, ANSI-stripped, prompt included.
    #[must_use]
    pub fn transcript(&self) -> String {
        let mut out = self.text.clone();
        out.push_str(&String::from_utf8_lossy(&self.pending));
        out
    }

    /// Consume the scanner and return the response without the trailing prompt.
    #[must_use]
    pub fn finish(self) -> String {
        let cleaned = self.transcript();
        let trimmed = cleaned.trim_end();
        let body = trimmed.strip_suffix(PROMPT).unwrap_or(trimmed);
        body.trim().to_string()
    }
}

/// Byte offset of an escape sequence at the end of `text` that may still be
/// completed by the next chunk.
fn unfinished_escape(text: &str) -> Option<usize> {
    let pos = text.rfind('\x1b')?;
    let tail = &text[pos..];
    if tail.len() > MAX_PENDING_ESCAPE || ANSI_ESCAPE.find(tail).is_some_and(|m| m.start() == 0) {
        return None;
    }
    let could_continue = tail[1..].char_indices().all(|(i, c)| {
        if i == 0 {
            c == '['
        } else {
            c.is_ascii_digit() || c == ';' || c == '?'
        }
    });
    could_continue.then_some(pos)
}

// ── Failure classification ────────────────────────────────────────────────────

/// Return the first response line containing one of `signatures`.
#[must_use]
pub fn find_failure<'a>(response: &'a str, signatures: &[&str]) -> Option<&'a str> {
    response
        .lines()
        .map(str::trim)
        .find(|line| signatures.iter().any(|sig| line.contains(sig)))
}

/// Failure line of a `login` response, if any.
#[must_use]
pub fn auth_failure(response: &str) -> Option<&str> {
    find_failure(response, AUTH_FAILURES)
}

/// Failure line of any non-login response, if any.
///
/// Workshop downloads report errors as `Download item <id> failed (...)`,
/// with or without a leading `ERROR!`.
#[must_use]
pub fn command_failure(response: &str) -> Option<&str> {
    let (item, failed) = DOWNLOAD_FAILURE;
    response.lines().map(str::trim).find(|line| {
        COMMAND_FAILURES.iter().any(|sig| line.contains(sig))
            || (line.contains(item) && line.contains(failed))
    })
}
