// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! TM orchestrator.
//!
//! ```text
//! create_or_update(alignment_file, provenance)
//!   |
//!   +-- parse --> layout (scratch dir A)
//!   |
//!   +-- gateway.find_repository(TmId)
//!         |
//!         +-- absent  --> create_repository(A)          --> Created
//!         |
//!         +-- present --> clone_repository (scratch dir B)
//!                         next_version_from(branches, floor)
//!                         commit_version(B, vN, A/*)    --> Updated { vN }
//! ```
//!
//! Scratch directories are removed when the call returns, on every path,
//! including cancellation.

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span};

use super::alignment::{self, AlignmentPair};
use super::layout::{LayoutBuilder, TmLayout};
use super::version::{TmVersion, next_version_from};
use super::{Provenance, TmId};
use crate::config::Config;
use crate::config::types::TmConfig;
use crate::error::{self, FsError, TmError, TmResult};
use crate::gateway::RemoteGateway;
use crate::git::{GitIdentity, ShellBackend};
use crate::github::{GithubClient, RemoteRepo};

/// What a publish did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// A new repository was created; its default branch holds the snapshot.
    Created,
    /// An existing repository got a new version branch.
    Updated { version: TmVersion },
}

/// Result of [`TmService::create_or_update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmOutcome {
    pub tm_id: TmId,
    /// Browser URL of the repository.
    pub url: String,
    pub kind: OutcomeKind,
}

impl TmOutcome {
    /// The version written by an update, if any.
    #[must_use]
    pub const fn version(&self) -> Option<TmVersion> {
        match self.kind {
            OutcomeKind::Created => None,
            OutcomeKind::Updated { version } => Some(version),
        }
    }
}

impl std::fmt::Display for TmOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            OutcomeKind::Created => write!(f, "created {} at {}", self.tm_id, self.url),
            OutcomeKind::Updated { version } => {
                write!(f, "updated {} with {version} at {}", self.tm_id, self.url)
            }
        }
    }
}

/// Publishes alignments as versioned TM repositories.
#[derive(Debug, Clone)]
pub struct TmService {
    gateway: RemoteGateway,
    layout: LayoutBuilder,
    settings: TmConfig,
}

impl TmService {
    #[must_use]
    pub fn new(gateway: RemoteGateway, settings: TmConfig) -> Self {
        Self {
            layout: LayoutBuilder::new(settings.web_ide_url.clone()),
            gateway,
            settings,
        }
    }

    /// Service over the GitHub API and the git CLI.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` if the organization or token is not
    /// configured, or a `NetworkError` if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> TmResult<Self> {
        config.github.validate()?;
        let identity = GitIdentity::new(config.github.author_name(), config.github.author_email());
        let gateway = RemoteGateway::new(
            Arc::new(ShellBackend::new(identity)),
            Arc::new(GithubClient::new(&config.github)?),
            config.github.clone(),
            &config.tm,
        );
        Ok(Self::new(gateway, config.tm.clone()))
    }

    #[must_use]
    pub const fn gateway(&self) -> &RemoteGateway {
        &self.gateway
    }

    /// Publish the alignment file as a new TM or a new version of one.
    ///
    /// # Errors
    ///
    /// Fails with the error of the first step that fails; see [`TmError`].
    pub async fn create_or_update(
        &self,
        alignment_file: &Path,
        provenance: &Provenance,
    ) -> TmResult<TmOutcome> {
        let pairs = alignment::load(alignment_file).await?;
        self.publish_pairs(&pairs, provenance).await
    }

    /// [`Self::create_or_update`] that stops as soon as `token` is cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`TmError::Cancelled`] when cancelled before completion.
    pub async fn create_or_update_with_cancellation(
        &self,
        alignment_file: &Path,
        provenance: &Provenance,
        token: CancellationToken,
    ) -> TmResult<TmOutcome> {
        tokio::select! {
            biased;
            () = token.cancelled() => Err(TmError::Cancelled),
            result = self.create_or_update(alignment_file, provenance) => result,
        }
    }

    /// Publish already parsed pairs.
    ///
    /// # Errors
    ///
    /// Fails with the error of the first step that fails; see [`TmError`].
    pub async fn publish_pairs(
        &self,
        pairs: &[AlignmentPair],
        provenance: &Provenance,
    ) -> TmResult<TmOutcome> {
        let tm_id = provenance.tm_id()?;
        let span = info_span!("publish", tm = %tm_id);
        self.publish_inner(pairs, provenance, tm_id)
            .instrument(span)
            .await
    }

    async fn publish_inner(
        &self,
        pairs: &[AlignmentPair],
        provenance: &Provenance,
        tm_id: TmId,
    ) -> TmResult<TmOutcome> {
        let scratch = self.scratch_dir("layout").await?;
        let layout = self
            .layout
            .build(pairs, provenance, &scratch.path().join(tm_id.as_str()))
            .await?;

        let outcome = match self.gateway.find_repository(&tm_id).await? {
            None => {
                let repo = self.gateway.create_repository(layout.dir(), &tm_id).await?;
                TmOutcome {
                    tm_id,
                    url: repo.html_url,
                    kind: OutcomeKind::Created,
                }
            }
            Some(repo) => self.update(tm_id, repo, &layout).await?,
        };

        info!(%outcome, pairs = layout.pair_count(), "published");
        Ok(outcome)
    }

    async fn update(&self, tm_id: TmId, repo: RemoteRepo, layout: &TmLayout) -> TmResult<TmOutcome> {
        let scratch = self.scratch_dir("clone").await?;
        let local = self.gateway.clone_repository(&tm_id, scratch.path()).await?;
        let branches = self.gateway.remote_branches(&local).await?;
        let version = next_version_from(&branches, self.update_floor())?;

        self.gateway
            .commit_version(
                &local,
                &tm_id,
                version,
                &layout.files(),
                &self.settings.commit_message,
            )
            .await?;

        Ok(TmOutcome {
            tm_id,
            url: repo.html_url,
            kind: OutcomeKind::Updated { version },
        })
    }

    /// Version the next update of `tm_id` would get, from the host's branch
    /// list; `None` when the repository does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::Transient` when the host cannot be reached.
    pub async fn preview_next_version(&self, tm_id: &TmId) -> TmResult<Option<TmVersion>> {
        if !self.gateway.exists(tm_id).await? {
            return Ok(None);
        }
        let branches = self.gateway.upstream_branches(tm_id).await?;
        Ok(Some(next_version_from(&branches, self.update_floor())?))
    }

    fn update_floor(&self) -> TmVersion {
        TmVersion::new(u64::from(self.settings.initial_version.update_floor()))
            .unwrap_or(TmVersion::INITIAL)
    }

    /// Fresh directory under the configured scratch root (or the system
    /// temp dir), removed when the returned handle drops.
    pub(crate) async fn scratch_dir(&self, purpose: &str) -> TmResult<TempDir> {
        let root = match &self.settings.scratch_dir {
            Some(root) => {
                tokio::fs::create_dir_all(root)
                    .await
                    .map_err(|e| FsError::io(root, e))?;
                root.clone()
            }
            None => std::env::temp_dir(),
        };

        let prefix = format!("tm-{purpose}-");
        tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(&prefix)
                .tempdir_in(&root)
                .map_err(|e| TmError::from(FsError::io(&root, e)))
        })
        .await
        .map_err(|e| error::other(format!("scratch directory task failed: {e}")))?
    }
}
