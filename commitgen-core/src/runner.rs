// commitgen-core/src/runner.rs

//! Runs the configured command under a deadline and classifies how it ended.

use crate::errors::GenerateError;
use crate::validate::MAX_MESSAGE_BYTES;
use async_trait::async_trait;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, error, warn};

/// Deadline applied when the caller does not choose one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Stdout kept in memory. Anything this large fails the size check anyway,
/// so the rest is read and discarded.
const STDOUT_CAPTURE_LIMIT: usize = 4 * MAX_MESSAGE_BYTES;
const STDERR_CAPTURE_LIMIT: usize = 64 * 1024;

/// Executes a command string and returns its raw standard output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `command` and waits at most `timeout` for it to exit.
    ///
    /// On success the returned bytes are stdout exactly as the process wrote them.
    async fn run(&self, command: &str, timeout: Duration) -> Result<Vec<u8>, GenerateError>;
}

/// Raw result of one process run, before it is turned into a `Result`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub stdout: Vec<u8>,
    /// Trimmed stderr, `None` when the process wrote nothing (or only whitespace).
    pub stderr_snippet: Option<String>,
    /// The process did not run to a successful exit (spawn failure included).
    pub exit_failed: bool,
    pub timed_out: bool,
    /// System-level description of the failure, e.g. `exit status: 1`.
    pub system_error: Option<String>,
}

impl ExecutionOutcome {
    fn exited(status: ExitStatus, stdout: Vec<u8>, stderr: &[u8]) -> Self {
        let stderr_text = String::from_utf8_lossy(stderr).trim().to_string();
        Self {
            stdout,
            stderr_snippet: (!stderr_text.is_empty()).then_some(stderr_text),
            exit_failed: !status.success(),
            timed_out: false,
            system_error: (!status.success()).then(|| status.to_string()),
        }
    }

    fn failed(err: &io::Error) -> Self {
        Self {
            exit_failed: true,
            system_error: Some(err.to_string()),
            ..Self::default()
        }
    }

    fn timed_out() -> Self {
        Self {
            exit_failed: true,
            timed_out: true,
            ..Self::default()
        }
    }

    /// Applies the outcome priority: timeout, then stderr, then the system error.
    pub fn classify(self, timeout: Duration) -> Result<Vec<u8>, GenerateError> {
        if self.timed_out {
            return Err(GenerateError::Timeout { timeout });
        }
        if !self.exit_failed {
            return Ok(self.stdout);
        }
        match self.stderr_snippet {
            Some(stderr) => Err(GenerateError::CommandFailed { stderr }),
            None => Err(GenerateError::ExecutionFailed {
                detail: self
                    .system_error
                    .unwrap_or_else(|| "process failed without a reported error".to_string()),
            }),
        }
    }
}

/// Live runner: `sh -c <command>` (`cmd /C` on Windows).
///
/// **Trust boundary:** the command string comes from the user's own
/// configuration file and is handed to the shell unmodified, so pipelines
/// and redirection work. Never feed it untrusted input.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellCommandRunner;

impl ShellCommandRunner {
    fn build_command(command: &str) -> Command {
        let shell_executable = if cfg!(target_os = "windows") {
            "cmd"
        } else {
            "sh"
        };
        let shell_arg = if cfg!(target_os = "windows") {
            "/C"
        } else {
            "-c"
        };

        let mut std_cmd = std::process::Command::new(shell_executable);
        std_cmd
            .arg(shell_arg)
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Own process group, so a timeout can take down anything the shell started.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            std_cmd.process_group(0);
        }

        let mut cmd = Command::from(std_cmd);
        cmd.kill_on_drop(true);
        cmd
    }

    /// Spawns, drains both pipes while waiting, and races all of it against the deadline.
    pub async fn execute(command: &str, timeout: Duration) -> ExecutionOutcome {
        let mut child = match Self::build_command(command).spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(command = command, error = %e, "Failed to spawn command process");
                return ExecutionOutcome::failed(&e);
            }
        };
        // The group outlives the shell itself, so remember its id before the shell is reaped.
        let pgid = child.id();
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        let waited = tokio::time::timeout(timeout, async {
            tokio::try_join!(
                child.wait(),
                read_pipe(stdout_pipe, STDOUT_CAPTURE_LIMIT),
                read_pipe(stderr_pipe, STDERR_CAPTURE_LIMIT)
            )
        })
        .await;

        match waited {
            Ok(Ok((status, stdout, stderr))) => {
                debug!(
                    %status,
                    stdout_bytes = stdout.len(),
                    stderr_bytes = stderr.len(),
                    "Command process exited"
                );
                ExecutionOutcome::exited(status, stdout, &stderr)
            }
            Ok(Err(e)) => {
                warn!(command = command, error = %e, "I/O error while waiting on command");
                terminate(&mut child, pgid).await;
                ExecutionOutcome::failed(&e)
            }
            Err(_elapsed) => {
                warn!(command = command, timeout = ?timeout, "Command exceeded its deadline, killing it");
                terminate(&mut child, pgid).await;
                ExecutionOutcome::timed_out()
            }
        }
    }
}

#[async_trait]
impl CommandRunner for ShellCommandRunner {
    async fn run(&self, command: &str, timeout: Duration) -> Result<Vec<u8>, GenerateError> {
        let outcome = Self::execute(command, timeout).await;
        outcome.classify(timeout).map_err(|e| {
            match &e {
                GenerateError::CommandFailed { stderr } => {
                    error!("LLM command failed with stderr: {}", stderr)
                }
                other => error!(kind = ?other.kind(), "LLM command execution failed: {}", other),
            }
            e
        })
    }
}

/// Reads the pipe to EOF, keeping at most `limit` bytes.
///
/// The pipe is always drained so the writer never blocks on a full buffer.
async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>, limit: usize) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        (&mut pipe).take(limit as u64).read_to_end(&mut buf).await?;
        let discarded = tokio::io::copy(&mut pipe, &mut tokio::io::sink()).await?;
        if discarded > 0 {
            debug!(kept = buf.len(), discarded, "Pipe output exceeded capture limit");
        }
    }
    Ok(buf)
}

/// Kills the child's process group and reaps the child.
///
/// `pgid` is the child's pid captured at spawn. It stays valid after the shell
/// itself was reaped, as long as anything it started is still in the group.
async fn terminate(child: &mut Child, pgid: Option<u32>) {
    #[cfg(unix)]
    {
        if let Some(pgid) = pgid {
            // SAFETY: killpg only sends a signal; the group was created for this
            // child by process_group(0) at spawn.
            let rc = unsafe { libc::killpg(pgid as libc::pid_t, libc::SIGKILL) };
            if rc != 0 {
                debug!(pgid, error = %io::Error::last_os_error(), "killpg failed (group already gone)");
            }
        }
    }
    #[cfg(not(unix))]
    let _ = pgid;
    if let Err(e) = child.kill().await {
        debug!(error = %e, "Failed to kill command process (likely already exited)");
    }
}
