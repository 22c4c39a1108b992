// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run_with_cancellation(token)
//!              |
//!              v
//!     build_command()  args, cwd, piped stdio, kill_on_drop
//!              |
//!              v
//!          spawn()
//!         /       \
//!    wait()     token.cancelled()
//!        \         |
//!         \      kill + wait
//!          v       v
//!    exit_code != 0 and not interrupted --> ProcessError::NonZeroExit
//!              |
//!              v
//!       ProcessOutput
//! ```

use std::fmt::Write as _;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

use super::builder::{ProcessBuilder, ProcessOutput};
use crate::error::{ProcessError, TmResult};

/// Lines of stderr kept in a `NonZeroExit` error.
const STDERR_TAIL_LINES: usize = 20;

impl ProcessBuilder {
    fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Full command line, for logging.
    pub(super) fn command_line(&self) -> String {
        let mut cmd = format!("{}", self.program().display());
        for arg in self.args_slice() {
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());
        command.args(self.args_slice());
        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    /// Spawns and runs the process; killed when `token` is cancelled.
    ///
    /// A cancelled run returns `Ok` with `is_interrupted()` set.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::SpawnFailed` if the process cannot be started
    /// and `ProcessError::NonZeroExit` if it fails on its own.
    pub async fn run_with_cancellation(self, token: CancellationToken) -> TmResult<ProcessOutput> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if token.is_cancelled() {
            return Ok(ProcessOutput::new(-1, String::new(), String::new(), true));
        }

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let spawn_failed = |source| ProcessError::SpawnFailed {
            command: cmd_line.clone(),
            source,
        };
        let mut child = self.build_command().spawn().map_err(spawn_failed)?;
        trace!(process = %name, pid = ?child.id(), "spawned");

        let stdout_handle = tokio::spawn(read_stream(child.stdout.take(), name.clone(), "stdout"));
        let stderr_handle = tokio::spawn(read_stream(child.stderr.take(), name.clone(), "stderr"));

        let (exit_status, interrupted) = tokio::select! {
            status = child.wait() => (status.map_err(spawn_failed)?, false),
            () = token.cancelled() => {
                warn!(process = %name, "cancellation requested, terminating process");
                if let Err(e) = child.kill().await {
                    warn!(process = %name, error = %e, "failed to kill process");
                }
                (child.wait().await.map_err(spawn_failed)?, true)
            }
        };

        // Grandchildren may still hold the pipes of a killed process open.
        let (stdout, stderr) = if interrupted {
            stdout_handle.abort();
            stderr_handle.abort();
            (String::new(), String::new())
        } else {
            (
                stdout_handle.await.unwrap_or_default(),
                stderr_handle.await.unwrap_or_default(),
            )
        };
        let output = ProcessOutput::new(
            exit_status.code().unwrap_or(-1),
            stdout,
            stderr,
            interrupted,
        );

        if !output.is_interrupted() && !output.success() {
            error!(process = %name, exit_code = output.exit_code(), "process failed");
            return Err(ProcessError::NonZeroExit {
                command: name,
                code: output.exit_code(),
                stderr: tail(output.stderr(), STDERR_TAIL_LINES),
            }
            .into());
        }

        trace!(
            process = %name,
            exit_code = output.exit_code(),
            interrupted = output.is_interrupted(),
            "completed"
        );
        Ok(output)
    }
}

/// Forward each line to the log and keep it.
async fn read_stream<R>(stream: Option<R>, process: String, stream_name: &'static str) -> String
where
    R: AsyncRead + Unpin,
{
    let Some(stream) = stream else {
        return String::new();
    };
    let mut lines = BufReader::new(stream).lines();
    let mut captured = String::new();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                debug!(process = %process, stream = stream_name, "{line}");
                captured.push_str(&line);
                captured.push('\n');
            }
            Ok(None) => break,
            Err(e) => {
                warn!(process = %process, stream = stream_name, error = %e, "read failed");
                break;
            }
        }
    }
    captured
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}
