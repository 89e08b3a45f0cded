//! Bounded, deadlock-free execution of external commands.
//!
//! The classic failure mode when capturing a child's stdout and stderr
//! through two pipes is to read them one after the other: the child fills
//! the unread pipe, blocks on its next write, and never reaches the data
//! the parent is waiting for. Both streams are therefore drained through a
//! single multiplexed wait that is ready whenever either stream is, with an
//! idle timeout and a combined output cap bounding a hostile or wedged
//! tool. Every spawned child is reaped on every exit path.

use std::borrow::Cow;
use std::ffi::OsStr;
use std::process::Stdio;

use tokio::io::AsyncReadExt;
use tokio::process::Child;
use tokio::process::Command;
use tracing::debug;
use tracing::warn;

use crate::ArchiveError;
use crate::Result;
use crate::RunnerConfig;

const READ_CHUNK_BYTES: usize = 4096;

/// Captured outcome of one subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// The child's exit code, or `-1` if it was killed by a signal.
    pub exit_code: i32,
    /// Everything the child wrote to stdout.
    pub stdout: Vec<u8>,
    /// Everything the child wrote to stderr.
    pub stderr: Vec<u8>,
}

impl ProcessResult {
    /// Returns `true` if the child exited with status 0.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns stdout decoded as UTF-8, with invalid sequences replaced.
    #[must_use]
    pub fn stdout_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    /// Returns stderr decoded as UTF-8, with invalid sequences replaced.
    #[must_use]
    pub fn stderr_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }
}

enum Drained {
    Stdout(std::io::Result<usize>),
    Stderr(std::io::Result<usize>),
}

/// Executes one external command per call under the configured bounds.
///
/// Arguments are passed to the operating system verbatim; no shell ever
/// interprets them, so hostile file names cannot inject commands. The
/// child's stdin is closed from the start because no step of the pipeline
/// sends input.
///
/// Each [`execute`](Self::execute) call is independent: the runner keeps no
/// state between calls.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    config: RunnerConfig,
}

impl ProcessRunner {
    /// Creates a runner with the given bounds.
    #[must_use]
    pub const fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Returns the configured bounds.
    #[must_use]
    pub const fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Runs `program` with `args`, draining both output streams until the
    /// child closes them, then reaping it and returning its exit status and
    /// captured output.
    ///
    /// The call blocks the current thread until the child terminates or a
    /// bound fires; it hosts its own single-threaded async runtime and must
    /// not be invoked from inside another async runtime.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::CommandNotFound`] if `program` cannot be found or
    ///   started.
    /// - [`ArchiveError::Timeout`] if neither stream becomes readable
    ///   within the idle window.
    /// - [`ArchiveError::OutputLimitExceeded`] if combined output passes
    ///   the configured cap.
    /// - [`ArchiveError::Io`] for any other spawn, read, or wait failure.
    ///
    /// On every error path the child has been killed and reaped before the
    /// error is returned.
    pub fn execute<I, S>(&self, program: &str, args: I) -> Result<ProcessResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .enable_time()
            .build()?;
        runtime.block_on(self.run(program, args))
    }

    async fn run<I, S>(&self, program: &str, args: I) -> Result<ProcessResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        debug!(program, "spawning subprocess");
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                if err.kind() == std::io::ErrorKind::NotFound {
                    ArchiveError::CommandNotFound {
                        program: program.to_string(),
                    }
                } else {
                    ArchiveError::Io(err)
                }
            })?;

        let (Some(mut stdout_pipe), Some(mut stderr_pipe)) =
            (child.stdout.take(), child.stderr.take())
        else {
            let error = std::io::Error::other("child spawned without piped output streams");
            return Err(Self::kill_and_reap(child, error.into()).await);
        };

        let mut stdout_buf: Vec<u8> = Vec::new();
        let mut stderr_buf: Vec<u8> = Vec::new();
        let mut stdout_chunk = [0u8; READ_CHUNK_BYTES];
        let mut stderr_chunk = [0u8; READ_CHUNK_BYTES];
        let mut stdout_open = true;
        let mut stderr_open = true;

        while stdout_open || stderr_open {
            // One wait covers both pipes so a full pipe on either stream
            // can never stall the other. The reads are cancel-safe, so the
            // timeout wrapper cannot drop data.
            let wait_for_either = async {
                tokio::select! {
                    read = stdout_pipe.read(&mut stdout_chunk), if stdout_open => {
                        Drained::Stdout(read)
                    }
                    read = stderr_pipe.read(&mut stderr_chunk), if stderr_open => {
                        Drained::Stderr(read)
                    }
                }
            };

            let Ok(drained) =
                tokio::time::timeout(self.config.idle_timeout, wait_for_either).await
            else {
                let seconds = self.config.idle_timeout.as_secs();
                warn!(seconds, "subprocess produced no output within the idle window");
                return Err(Self::kill_and_reap(child, ArchiveError::Timeout { seconds }).await);
            };

            match drained {
                Drained::Stdout(Ok(0)) => stdout_open = false,
                Drained::Stdout(Ok(count)) => stdout_buf.extend_from_slice(&stdout_chunk[..count]),
                Drained::Stderr(Ok(0)) => stderr_open = false,
                Drained::Stderr(Ok(count)) => stderr_buf.extend_from_slice(&stderr_chunk[..count]),
                Drained::Stdout(Err(err)) | Drained::Stderr(Err(err)) => {
                    return Err(Self::kill_and_reap(child, err.into()).await);
                }
            }

            let total = (stdout_buf.len() + stderr_buf.len()) as u64;
            if total > self.config.max_output_bytes {
                let limit = self.config.max_output_bytes;
                warn!(total, limit, "subprocess output exceeded the configured cap");
                return Err(
                    Self::kill_and_reap(child, ArchiveError::OutputLimitExceeded { limit }).await,
                );
            }
        }

        // Both pipes are closed; the child should be exiting. Bound the
        // reap too, so a child that closed its pipes but never exits
        // cannot hang the call.
        let status = match tokio::time::timeout(self.config.idle_timeout, child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                let seconds = self.config.idle_timeout.as_secs();
                warn!(seconds, "subprocess closed its pipes but did not exit");
                return Err(Self::kill_and_reap(child, ArchiveError::Timeout { seconds }).await);
            }
        };

        let exit_code = status.code().unwrap_or(-1);
        debug!(
            exit_code,
            stdout_bytes = stdout_buf.len(),
            stderr_bytes = stderr_buf.len(),
            "subprocess finished"
        );
        Ok(ProcessResult {
            exit_code,
            stdout: stdout_buf,
            stderr: stderr_buf,
        })
    }

    // Kills and reaps the child, then hands the original error back.
    async fn kill_and_reap(mut child: Child, error: ArchiveError) -> ArchiveError {
        child.start_kill().ok();
        let _ = child.wait().await;
        error
    }
}
