// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitProtocol (async) --> ShellBackend (git CLI)
//!                           .remote_branches --> GixBackend (pure Rust gix)
//! ```

use std::path::{Path, PathBuf};
use std::process::Stdio;

use futures_util::future::BoxFuture;
use tokio::process::Command;
use tracing::trace;

use super::GitIdentity;
use crate::error::{self, GitError, GixError, ProcessError, TmResult};
use crate::logging::{redact_text, redact_url};

/// Git operations needed to publish TM snapshots.
///
/// Object safe so the gateway can hold `Arc<dyn GitProtocol>`; tests swap
/// in recording fakes.
pub trait GitProtocol: Send + Sync {
    /// Initialize a repository in `dir`.
    fn init<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, TmResult<()>>;

    /// Stage every file in the worktree.
    fn stage_all<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, TmResult<()>>;

    /// Stage the named worktree files.
    fn stage<'a>(&'a self, dir: &'a Path, names: &'a [String]) -> BoxFuture<'a, TmResult<()>>;

    /// Commit the index.
    fn commit<'a>(&'a self, dir: &'a Path, message: &'a str) -> BoxFuture<'a, TmResult<()>>;

    /// Rename the current branch, overwriting an existing one (`branch -M`).
    fn rename_branch<'a>(&'a self, dir: &'a Path, name: &'a str) -> BoxFuture<'a, TmResult<()>>;

    /// Add a remote.
    fn add_remote<'a>(
        &'a self,
        dir: &'a Path,
        name: &'a str,
        url: &'a str,
    ) -> BoxFuture<'a, TmResult<()>>;

    /// Push `refspec` to `remote`; never forced.
    fn push<'a>(
        &'a self,
        dir: &'a Path,
        remote: &'a str,
        refspec: &'a str,
        set_upstream: bool,
    ) -> BoxFuture<'a, TmResult<()>>;

    /// Clone `url` into `dest`, which must not exist yet.
    fn clone_repo<'a>(&'a self, url: &'a str, dest: &'a Path) -> BoxFuture<'a, TmResult<()>>;

    /// Switch to a new branch with no history.
    fn checkout_orphan<'a>(&'a self, dir: &'a Path, branch: &'a str)
    -> BoxFuture<'a, TmResult<()>>;

    /// Remove every tracked file from the index and the worktree.
    fn clear_worktree<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, TmResult<()>>;

    /// Remote-tracking branch names of `origin`, prefix stripped.
    fn remote_branches<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, TmResult<Vec<String>>>;
}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
///
/// Read-only queries without spawning subprocesses.
pub struct GixBackend;

impl GixBackend {
    /// Branch names known under `refs/remotes/origin/`, without the prefix.
    ///
    /// The symbolic `origin/HEAD` is skipped.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened or its
    /// references cannot be read.
    pub fn remote_branches(path: &Path) -> TmResult<Vec<String>> {
        let repo = gix::open(path).map_err(|e| GitError::Gix(GixError::Open(Box::new(e))))?;
        let references = repo
            .references()
            .map_err(|e| GitError::Gix(GixError::References(e.to_string())))?;
        let iter = references
            .remote_branches()
            .map_err(|e| GitError::Gix(GixError::References(e.to_string())))?;

        let mut branches = Vec::new();
        for reference in iter {
            let reference =
                reference.map_err(|e| GitError::Gix(GixError::References(e.to_string())))?;
            let short = reference.name().shorten().to_string();
            if let Some(branch) = short.strip_prefix("origin/")
                && branch != "HEAD"
            {
                branches.push(branch.to_string());
            }
        }
        branches.sort();
        Ok(branches)
    }
}

// --- ShellBackend Implementation (Git CLI) ---

/// Shell-based git backend using the git CLI.
///
/// Every command runs with `GCM_INTERACTIVE=never` and
/// `GIT_TERMINAL_PROMPT=0` so a missing credential fails instead of hanging.
#[derive(Debug, Clone)]
pub struct ShellBackend {
    identity: GitIdentity,
}

impl ShellBackend {
    #[must_use]
    pub const fn new(identity: GitIdentity) -> Self {
        Self { identity }
    }

    /// Execute a git command in `cwd` and return its trimmed stdout.
    pub(crate) async fn git_command(&self, args: &[&str], cwd: &Path) -> TmResult<String> {
        let command = display_command(args);
        trace!(cwd = %cwd.display(), cmd = %command, "git");

        let output = Command::new("git")
            .arg("-c")
            .arg(format!("user.name={}", self.identity.name))
            .arg("-c")
            .arg(format!("user.email={}", self.identity.email))
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ProcessError::SpawnFailed {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command,
                message: redact_text(String::from_utf8_lossy(&output.stderr).trim()),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

fn display_command(args: &[&str]) -> String {
    let redacted: Vec<String> = args.iter().map(|arg| redact_url(arg)).collect();
    format!("git {}", redacted.join(" "))
}

fn path_str(path: &Path) -> TmResult<&str> {
    path.to_str()
        .ok_or_else(|| GitError::InvalidPath(path.display().to_string()).into())
}

impl GitProtocol for ShellBackend {
    fn init<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move {
            self.git_command(&["init", "--quiet"], dir).await?;
            Ok(())
        })
    }

    fn stage_all<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move {
            self.git_command(&["add", "--all"], dir).await?;
            Ok(())
        })
    }

    fn stage<'a>(&'a self, dir: &'a Path, names: &'a [String]) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move {
            let mut args = vec!["add", "--"];
            args.extend(names.iter().map(String::as_str));
            self.git_command(&args, dir).await?;
            Ok(())
        })
    }

    fn commit<'a>(&'a self, dir: &'a Path, message: &'a str) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move {
            self.git_command(&["commit", "--quiet", "-m", message], dir)
                .await?;
            Ok(())
        })
    }

    fn rename_branch<'a>(&'a self, dir: &'a Path, name: &'a str) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move {
            self.git_command(&["branch", "-M", name], dir).await?;
            Ok(())
        })
    }

    fn add_remote<'a>(
        &'a self,
        dir: &'a Path,
        name: &'a str,
        url: &'a str,
    ) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move {
            self.git_command(&["remote", "add", name, url], dir).await?;
            Ok(())
        })
    }

    fn push<'a>(
        &'a self,
        dir: &'a Path,
        remote: &'a str,
        refspec: &'a str,
        set_upstream: bool,
    ) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move {
            // No --quiet: rejection details are only printed without it.
            let mut args = vec!["push"];
            if set_upstream {
                args.push("--set-upstream");
            }
            args.extend([remote, refspec]);
            self.git_command(&args, dir).await?;
            Ok(())
        })
    }

    fn clone_repo<'a>(&'a self, url: &'a str, dest: &'a Path) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move {
            let dest_str = path_str(dest)?;
            let parent = dest.parent().unwrap_or_else(|| Path::new("."));
            self.git_command(&["clone", "--quiet", url, dest_str], parent)
                .await?;
            Ok(())
        })
    }

    fn checkout_orphan<'a>(
        &'a self,
        dir: &'a Path,
        branch: &'a str,
    ) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move {
            self.git_command(&["checkout", "--quiet", "--orphan", branch], dir)
                .await?;
            Ok(())
        })
    }

    fn clear_worktree<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move {
            self.git_command(&["rm", "-r", "-f", "--quiet", "--ignore-unmatch", "."], dir)
                .await?;
            Ok(())
        })
    }

    fn remote_branches<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, TmResult<Vec<String>>> {
        Box::pin(async move {
            let dir: PathBuf = dir.to_path_buf();
            tokio::task::spawn_blocking(move || GixBackend::remote_branches(&dir))
                .await
                .map_err(|e| error::other(format!("branch listing task failed: {e}")))?
        })
    }
}
