//! Infrastructure implementation of the `ProcessTransport` port.
//!
//! `SteamCmdTransport` owns one steamcmd child process. Commands are written
//! to its stdin one line at a time; stdout is read in raw chunks until the
//! `Steam>` prompt shows up, since the prompt is not newline-terminated.
//!
//! Every read races a deadline and the cancellation token, so a hung or
//! crashed installer can never block the caller forever. After a timeout or
//! cancellation the protocol is out of sync, so the process is killed.

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::application::ports::ProcessTransport;
use crate::domain::protocol::{self, ResponseScanner};
use crate::domain::{InstallerSpec, SessionError, Timeouts};

const READ_CHUNK: usize = 8192;

/// Pseudo-command name used in errors raised while waiting for the first prompt.
const STARTUP: &str = "<startup>";

/// Production `ProcessTransport` backed by a tokio child process.
pub struct SteamCmdTransport {
    program: String,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout: ChildStdout,
    close_grace: Duration,
}

impl SteamCmdTransport {
    /// Spawn the installer and wait for its first prompt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Spawn` if the program cannot be launched or
    /// never reaches its prompt within `timeouts.startup`.
    pub async fn start(
        spec: &InstallerSpec,
        timeouts: &Timeouts,
        cancel: &CancellationToken,
    ) -> Result<Self, SessionError> {
        let program = spec.program.clone();
        let mut child = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SessionError::Spawn {
                program: program.clone(),
                reason: if e.kind() == ErrorKind::NotFound {
                    "program not found".to_string()
                } else {
                    e.to_string()
                },
            })?;
        info!(program = %program, pid = ?child.id(), "installer started");

        let not_captured = |stream: &str| SessionError::Spawn {
            program: program.clone(),
            reason: format!("{stream} was not captured"),
        };
        let stdin = child.stdin.take().ok_or_else(|| not_captured("stdin"))?;
        let stdout = child.stdout.take().ok_or_else(|| not_captured("stdout"))?;
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(drain_stderr(stderr));
        }

        let mut transport = Self {
            program: program.clone(),
            child: Some(child),
            stdin: Some(stdin),
            stdout,
            close_grace: timeouts.close_grace,
        };

        match transport
            .read_until_prompt(STARTUP, timeouts.startup, cancel)
            .await
        {
            Ok(banner) => {
                debug!(banner = %banner, "installer ready");
                Ok(transport)
            }
            Err(e) => {
                transport.kill().await;
                Err(SessionError::Spawn {
                    program,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Read stdout until the prompt, the deadline, EOF, or cancellation.
    async fn read_until_prompt(
        &mut self,
        command: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<String, SessionError> {
        let deadline = Instant::now() + timeout;
        let mut scanner = ResponseScanner::new();
        let mut buf = vec![0u8; READ_CHUNK];

        loop {
            let n = tokio::select! {
                read = self.stdout.read(&mut buf) => {
                    read.map_err(|source| SessionError::Read { source })?
                }
                () = tokio::time::sleep_until(deadline) => {
                    trace!(partial = %scanner.transcript(), "timed out waiting for prompt");
                    return Err(SessionError::Timeout {
                        command: command.to_string(),
                        after: timeout,
                    });
                }
                () = cancel.cancelled() => {
                    return Err(SessionError::Cancelled {
                        command: command.to_string(),
                    });
                }
            };

            if n == 0 {
                debug!(partial = %scanner.transcript(), "installer stdout closed");
                return Err(SessionError::ProcessExited {
                    command: command.to_string(),
                });
            }
            scanner.feed(&buf[..n]);
            if scanner.is_complete() {
                return Ok(scanner.finish());
            }
        }
    }

    /// Kill the process without asking; used once the protocol is out of sync.
    async fn kill(&mut self) {
        self.stdin = None;
        if let Some(mut child) = self.child.take() {
            warn!(program = %self.program, "killing installer");
            if let Err(e) = child.kill().await {
                warn!(error = %e, "failed to kill installer");
            }
        }
    }
}

impl ProcessTransport for SteamCmdTransport {
    async fn exec(
        &mut self,
        command: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<String, SessionError> {
        if cancel.is_cancelled() {
            return Err(SessionError::Cancelled {
                command: command.to_string(),
            });
        }
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(SessionError::Closed);
        };

        debug!(command, "sending to installer");
        let line = format!("{command}\n");
        let written = match stdin.write_all(line.as_bytes()).await {
            Ok(()) => stdin.flush().await,
            Err(e) => Err(e),
        };
        if let Err(source) = written {
            return Err(if source.kind() == ErrorKind::BrokenPipe {
                SessionError::ProcessExited {
                    command: command.to_string(),
                }
            } else {
                SessionError::Write {
                    command: command.to_string(),
                    source,
                }
            });
        }

        match self.read_until_prompt(command, timeout, cancel).await {
            Ok(response) => {
                trace!(command, response = %response, "installer response");
                Ok(response)
            }
            Err(e @ (SessionError::Timeout { .. } | SessionError::Cancelled { .. })) => {
                self.kill().await;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        if let Some(mut stdin) = self.stdin.take() {
            let quit = format!("{}\n", protocol::QUIT);
            if let Err(e) = stdin.write_all(quit.as_bytes()).await {
                debug!(error = %e, "could not send quit");
            }
            if let Err(e) = stdin.flush().await {
                debug!(error = %e, "could not flush quit");
            }
        }

        match tokio::time::timeout(self.close_grace, child.wait()).await {
            Ok(Ok(status)) => {
                info!(program = %self.program, %status, "installer exited");
                Ok(())
            }
            Ok(Err(e)) => {
                warn!(error = %e, "error waiting for installer exit");
                force_kill(&mut child).await
            }
            Err(_) => {
                warn!(
                    grace_secs = self.close_grace.as_secs(),
                    "installer did not exit after quit"
                );
                force_kill(&mut child).await
            }
        }
    }
}

impl Drop for SteamCmdTransport {
    fn drop(&mut self) {
        if let Some(child) = self.child.as_mut() {
            if let Ok(None) = child.try_wait() {
                warn!(program = %self.program, "transport dropped while installer still running");
            }
        }
        // kill_on_drop(true) handles actual cleanup
    }
}

async fn force_kill(child: &mut Child) -> Result<(), SessionError> {
    child.kill().await.map_err(|e| SessionError::Close {
        reason: e.to_string(),
    })
}

/// Log installer stderr so a full pipe never stalls the process.
async fn drain_stderr(stderr: tokio::process::ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        debug!(stderr = %line, "installer stderr");
    }
}
