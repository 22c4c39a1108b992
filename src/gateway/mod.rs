// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Remote repository gateway.
//!
//! ```text
//! create_repository(layout_dir, tm_id)
//!   git init / add --all / commit "Initial commit"
//!   POST /orgs/{org}/repos            (HostApi)
//!   sleep propagation_delay
//!   remote add origin {git_url}/{org}/{tm_id}.git
//!   branch -M main / push -u origin main
//!   [explicit] push origin main:refs/heads/v1
//!
//! clone_repository(tm_id, target)     --> target/{tm_id}
//! remote_branches(local)              --> ["main", "v1", ...]
//!
//! commit_version(local, tm_id, vN, files, message)
//!   checkout --orphan vN / rm -r -f .
//!   copy files by name / add / commit
//!   [guard] list upstream branches, vN taken --> Conflict
//!   push origin vN                    rejected --> Conflict
//! ```
//!
//! Failures are reported as the `RepoError` variant of the operation they
//! happened in. Network errors and errors that already are a `RepoError`
//! pass through unchanged.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::types::{GithubConfig, InitialVersion, TmConfig};
use crate::error::{FsError, GitError, RepoError, TmError, TmResult};
use crate::git::GitProtocol;
use crate::github::{HostApi, RemoteRepo};
use crate::logging::redact_url;
use crate::tm::TmId;
use crate::tm::version::{TmVersion, latest_version};

const REMOTE: &str = "origin";
const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// Remote repository operations for TM repositories.
#[derive(Clone)]
pub struct RemoteGateway {
    git: Arc<dyn GitProtocol>,
    api: Arc<dyn HostApi>,
    github: GithubConfig,
    initial_version: InitialVersion,
    guard_concurrent_updates: bool,
}

impl std::fmt::Debug for RemoteGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteGateway")
            .field("github", &self.github)
            .field("initial_version", &self.initial_version)
            .field("guard_concurrent_updates", &self.guard_concurrent_updates)
            .finish_non_exhaustive()
    }
}

impl RemoteGateway {
    #[must_use]
    pub fn new(
        git: Arc<dyn GitProtocol>,
        api: Arc<dyn HostApi>,
        github: GithubConfig,
        tm: &TmConfig,
    ) -> Self {
        Self {
            git,
            api,
            github,
            initial_version: tm.initial_version,
            guard_concurrent_updates: tm.guard_concurrent_updates,
        }
    }

    /// Git URL of a TM repository, with credentials embedded for http(s).
    #[must_use]
    pub fn remote_url(&self, tm_id: &TmId) -> String {
        let base = self.github.git_url.trim_end_matches('/');
        let org = &self.github.org;
        match base.split_once("://") {
            Some((scheme @ ("http" | "https"), host)) if !self.github.token.is_empty() => {
                let user = match self.github.author_name() {
                    "" => "x-access-token",
                    name => name,
                };
                format!(
                    "{scheme}://{user}:{token}@{host}/{org}/{tm_id}.git",
                    token = self.github.token
                )
            }
            _ => format!("{base}/{org}/{tm_id}.git"),
        }
    }

    /// Existence oracle; returns the repository when it exists.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::Transient` when the host cannot be reached.
    pub async fn find_repository(&self, tm_id: &TmId) -> TmResult<Option<RemoteRepo>> {
        self.api.find_repo(tm_id).await
    }

    /// Whether a repository named `tm_id` exists.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::Transient` when the host cannot be reached.
    pub async fn exists(&self, tm_id: &TmId) -> TmResult<bool> {
        self.api.repo_exists(tm_id).await
    }

    /// Branch names of the upstream repository, as the host reports them.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::Transient` when the host cannot be reached.
    pub async fn upstream_branches(&self, tm_id: &TmId) -> TmResult<Vec<String>> {
        self.api.list_branches(tm_id).await
    }

    /// Publish `layout_dir` as a new repository named `tm_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Creation` if any step fails.
    pub async fn create_repository(&self, layout_dir: &Path, tm_id: &TmId) -> TmResult<RemoteRepo> {
        self.try_create(layout_dir, tm_id)
            .await
            .map_err(|e| wrap(e, |message| RepoError::Creation {
                repo: tm_id.to_string(),
                message,
            }))
    }

    async fn try_create(&self, dir: &Path, tm_id: &TmId) -> TmResult<RemoteRepo> {
        let branch = self.github.default_branch.as_str();

        self.git.init(dir).await?;
        self.git.stage_all(dir).await?;
        self.git.commit(dir, INITIAL_COMMIT_MESSAGE).await?;

        let repo = self.api.create_repo(tm_id).await?;

        let delay = self.github.propagation_delay();
        if !delay.is_zero() {
            debug!(?delay, "waiting for the new repository to become pushable");
            tokio::time::sleep(delay).await;
        }

        let url = self.remote_url(tm_id);
        self.git.add_remote(dir, REMOTE, &url).await?;
        self.git.rename_branch(dir, branch).await?;
        self.git.push(dir, REMOTE, branch, true).await?;

        if self.initial_version == InitialVersion::Explicit {
            let refspec = format!("{branch}:refs/heads/{}", TmVersion::INITIAL);
            self.git.push(dir, REMOTE, &refspec, false).await?;
        }

        info!(repo = %tm_id, remote = %redact_url(&url), "initial snapshot pushed");
        Ok(repo)
    }

    /// Clone `tm_id` into `target_dir/{tm_id}` and return that path.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Clone` if the repository cannot be cloned.
    pub async fn clone_repository(&self, tm_id: &TmId, target_dir: &Path) -> TmResult<PathBuf> {
        let dest = target_dir.join(tm_id.as_str());
        let url = self.remote_url(tm_id);
        debug!(repo = %tm_id, dest = %dest.display(), "cloning");

        self.git
            .clone_repo(&url, &dest)
            .await
            .map_err(|e| wrap(e, |message| RepoError::Clone {
                repo: tm_id.to_string(),
                message,
            }))?;
        Ok(dest)
    }

    /// Branch names of a local clone's remote.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the clone's references cannot be read.
    pub async fn remote_branches(&self, local_repo: &Path) -> TmResult<Vec<String>> {
        self.git.remote_branches(local_repo).await
    }

    /// Publish `files` as the sole content of a new branch `version`.
    ///
    /// Files land in the worktree root under their own names. The push is
    /// never forced, so an existing branch of the same name is not touched.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Conflict` if the version already exists upstream,
    /// `NetworkError::Transient` if the guard cannot list branches, and
    /// `RepoError::VersionCommit` for any other failure.
    pub async fn commit_version(
        &self,
        local_repo: &Path,
        tm_id: &TmId,
        version: TmVersion,
        files: &[PathBuf],
        message: &str,
    ) -> TmResult<()> {
        let label = version.label();
        let commit_error = |message: String| RepoError::VersionCommit {
            repo: tm_id.to_string(),
            version: label.clone(),
            message,
        };

        self.prepare_orphan(local_repo, &label, files, message)
            .await
            .map_err(|e| wrap(e, commit_error))?;

        if self.guard_concurrent_updates {
            self.guard(tm_id, version).await?;
        }

        match self.git.push(local_repo, REMOTE, &label, false).await {
            Ok(()) => {
                info!(repo = %tm_id, version = %label, "version pushed");
                Ok(())
            }
            Err(TmError::Git(err)) if err.is_push_rejection() => {
                warn!(repo = %tm_id, version = %label, "push rejected");
                Err(RepoError::Conflict {
                    repo: tm_id.to_string(),
                    version: label.clone(),
                    message: err.to_string(),
                }
                .into())
            }
            Err(e) => Err(wrap(e, commit_error)),
        }
    }

    async fn prepare_orphan(
        &self,
        dir: &Path,
        label: &str,
        files: &[PathBuf],
        message: &str,
    ) -> TmResult<()> {
        self.git.checkout_orphan(dir, label).await?;
        self.git.clear_worktree(dir).await?;

        let mut names = Vec::with_capacity(files.len());
        for file in files {
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| GitError::InvalidPath(file.display().to_string()))?;
            let dest = dir.join(name);
            if dest != *file {
                tokio::fs::copy(file, &dest)
                    .await
                    .map_err(|e| FsError::io(file, e))?;
            }
            names.push(name.to_string());
        }

        self.git.stage(dir, &names).await?;
        self.git.commit(dir, message).await
    }

    /// Refuse to push when `version` (or a later one) appeared upstream
    /// since the clone was taken.
    async fn guard(&self, tm_id: &TmId, version: TmVersion) -> TmResult<()> {
        let upstream = self.api.list_branches(tm_id).await?;
        match latest_version(&upstream)? {
            Some(latest) if latest >= version => {
                warn!(repo = %tm_id, version = %version, %latest, "version taken upstream");
                Err(RepoError::Conflict {
                    repo: tm_id.to_string(),
                    version: version.label(),
                    message: format!("upstream already has {latest}"),
                }
                .into())
            }
            _ => Ok(()),
        }
    }
}

/// Report `err` as the operation's `RepoError`, keeping errors that already
/// carry their own meaning.
fn wrap(err: TmError, into: impl FnOnce(String) -> RepoError) -> TmError {
    match err {
        TmError::Repo(_) | TmError::Network(_) | TmError::Cancelled => err,
        other => into(other.to_string()).into(),
    }
}

#[cfg(test)]
pub(crate) mod fake;
