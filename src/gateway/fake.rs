// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory host plus git used by gateway and service tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures_util::future::BoxFuture;

use super::RemoteGateway;
use crate::config::types::{GithubConfig, TmConfig};
use crate::error::{GitError, NetworkError, RepoError, TmResult};
use crate::git::GitProtocol;
use crate::github::{HostApi, RemoteRepo};
use crate::tm::TmId;

#[derive(Debug, Default)]
struct State {
    /// Upstream repositories and their branches.
    repos: BTreeMap<String, BTreeSet<String>>,
    /// Local directory -> repository it pushes to.
    remotes: HashMap<PathBuf, String>,
    /// Remote-tracking branches each clone saw.
    snapshots: HashMap<PathBuf, Vec<String>>,
    calls: Vec<String>,
    failing: Option<&'static str>,
    offline: bool,
    publish_during_update: Option<String>,
    clone_delay: Option<Duration>,
}

/// Simulated organization: implements both [`HostApi`] and [`GitProtocol`].
#[derive(Debug, Default)]
pub(crate) struct FakeHub {
    state: Mutex<State>,
}

impl FakeHub {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Seed an existing repository.
    pub(crate) fn with_repo(self: Arc<Self>, name: &str, branches: &[&str]) -> Arc<Self> {
        self.state().repos.insert(
            name.to_string(),
            branches.iter().map(ToString::to_string).collect(),
        );
        self
    }

    /// Make the named git operation fail.
    pub(crate) fn failing(self: Arc<Self>, op: &'static str) -> Arc<Self> {
        self.state().failing = Some(op);
        self
    }

    /// Make every host API call fail as unreachable.
    pub(crate) fn offline(self: Arc<Self>) -> Arc<Self> {
        self.state().offline = true;
        self
    }

    /// Another writer pushes `branch` right after the next clone is taken.
    pub(crate) fn publish_during_update(self: Arc<Self>, branch: &str) -> Arc<Self> {
        self.state().publish_during_update = Some(branch.to_string());
        self
    }

    pub(crate) fn slow_clone(self: Arc<Self>, delay: Duration) -> Arc<Self> {
        self.state().clone_delay = Some(delay);
        self
    }

    pub(crate) fn branches(&self, repo: &str) -> Vec<String> {
        self.state()
            .repos
            .get(repo)
            .map(|b| b.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub(crate) fn has_repo(&self, repo: &str) -> bool {
        self.state().repos.contains_key(repo)
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Number of recorded calls whose name is `op`.
    pub(crate) fn count(&self, op: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| call.split(' ').next() == Some(op))
            .count()
    }

    fn record(&self, call: String) -> TmResult<()> {
        let mut state = self.state();
        let op = call.split(' ').next().unwrap_or_default().to_string();
        state.calls.push(call.clone());
        if state.failing == Some(op.as_str()) {
            return Err(GitError::CommandFailed {
                command: format!("git {call}"),
                message: "fatal: simulated failure".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn check_online(&self, url: &str) -> TmResult<()> {
        if self.state().offline {
            return Err(NetworkError::Transient {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Gateway over this hub with tests' defaults.
    pub(crate) fn gateway(self: &Arc<Self>, tm: &TmConfig) -> RemoteGateway {
        let github = GithubConfig {
            org: "MonlamAI".to_string(),
            username: "bot".to_string(),
            token: "ghp_test".to_string(),
            propagation_delay_secs: 0,
            ..GithubConfig::default()
        };
        RemoteGateway::new(self.clone(), self.clone(), github, tm)
    }
}

fn repo_name(url: &str) -> String {
    url.rsplit('/')
        .next()
        .unwrap_or_default()
        .trim_end_matches(".git")
        .to_string()
}

impl HostApi for FakeHub {
    fn find_repo<'a>(&'a self, repo: &'a TmId) -> BoxFuture<'a, TmResult<Option<RemoteRepo>>> {
        Box::pin(async move {
            self.check_online(repo.as_str())?;
            self.state().calls.push(format!("find {repo}"));
            Ok(self.has_repo(repo.as_str()).then(|| RemoteRepo {
                name: repo.to_string(),
                html_url: format!("https://github.com/MonlamAI/{repo}"),
                default_branch: Some("main".to_string()),
                private: true,
            }))
        })
    }

    fn create_repo<'a>(&'a self, repo: &'a TmId) -> BoxFuture<'a, TmResult<RemoteRepo>> {
        Box::pin(async move {
            let mut state = self.state();
            state.calls.push(format!("create {repo}"));
            if state.repos.contains_key(repo.as_str()) {
                return Err(RepoError::Creation {
                    repo: repo.to_string(),
                    message: "name already exists on this account".to_string(),
                }
                .into());
            }
            state.repos.insert(repo.to_string(), BTreeSet::new());
            Ok(RemoteRepo {
                name: repo.to_string(),
                html_url: format!("https://github.com/MonlamAI/{repo}"),
                default_branch: None,
                private: true,
            })
        })
    }

    fn list_branches<'a>(&'a self, repo: &'a TmId) -> BoxFuture<'a, TmResult<Vec<String>>> {
        Box::pin(async move {
            self.check_online(repo.as_str())?;
            self.state().calls.push(format!("branches {repo}"));
            Ok(self.branches(repo.as_str()))
        })
    }
}

impl GitProtocol for FakeHub {
    fn init<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move { self.record(format!("init {}", dir.display())) })
    }

    fn stage_all<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move { self.record(format!("add-all {}", dir.display())) })
    }

    fn stage<'a>(&'a self, dir: &'a Path, names: &'a [String]) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move {
            for name in names {
                assert!(dir.join(name).is_file(), "{name} staged but not in worktree");
            }
            self.record(format!("add {}", names.join(" ")))
        })
    }

    fn commit<'a>(&'a self, _dir: &'a Path, message: &'a str) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move { self.record(format!("commit {message}")) })
    }

    fn rename_branch<'a>(&'a self, dir: &'a Path, name: &'a str) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move { self.record(format!("rename {name} {}", dir.display())) })
    }

    fn add_remote<'a>(
        &'a self,
        dir: &'a Path,
        name: &'a str,
        url: &'a str,
    ) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move {
            self.record(format!("remote {name} {url}"))?;
            self.state().remotes.insert(dir.to_path_buf(), repo_name(url));
            Ok(())
        })
    }

    fn push<'a>(
        &'a self,
        dir: &'a Path,
        remote: &'a str,
        refspec: &'a str,
        _set_upstream: bool,
    ) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move {
            self.record(format!("push {remote} {refspec}"))?;
            let branch = refspec
                .rsplit(':')
                .next()
                .unwrap_or(refspec)
                .trim_start_matches("refs/heads/")
                .to_string();
            let mut state = self.state();
            let repo = state.remotes.get(dir).cloned().unwrap_or_default();
            let branches = state.repos.entry(repo).or_default();
            if !branches.insert(branch.clone()) {
                return Err(GitError::CommandFailed {
                    command: format!("git push {remote} {refspec}"),
                    message: format!(" ! [rejected]        {branch} -> {branch} (fetch first)"),
                }
                .into());
            }
            Ok(())
        })
    }

    fn clone_repo<'a>(&'a self, url: &'a str, dest: &'a Path) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move {
            let delay = self.state().clone_delay;
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.record(format!("clone {url}"))?;
            std::fs::create_dir_all(dest).unwrap();

            let repo = repo_name(url);
            let mut state = self.state();
            let Some(branches) = state.repos.get(&repo).cloned() else {
                return Err(GitError::CommandFailed {
                    command: format!("git clone {url}"),
                    message: "fatal: repository not found".to_string(),
                }
                .into());
            };
            state
                .snapshots
                .insert(dest.to_path_buf(), branches.into_iter().collect());
            state.remotes.insert(dest.to_path_buf(), repo.clone());
            if let Some(branch) = state.publish_during_update.take() {
                state.repos.entry(repo).or_default().insert(branch);
            }
            Ok(())
        })
    }

    fn checkout_orphan<'a>(
        &'a self,
        dir: &'a Path,
        branch: &'a str,
    ) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move { self.record(format!("orphan {branch} {}", dir.display())) })
    }

    fn clear_worktree<'a>(&'a self, _dir: &'a Path) -> BoxFuture<'a, TmResult<()>> {
        Box::pin(async move { self.record("rm".to_string()) })
    }

    fn remote_branches<'a>(&'a self, dir: &'a Path) -> BoxFuture<'a, TmResult<Vec<String>>> {
        Box::pin(async move {
            self.record("ls-remote-branches".to_string())?;
            Ok(self.state().snapshots.get(dir).cloned().unwrap_or_default())
        })
    }
}
