// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Hosting service admin API.
//!
//! ```text
//! HostApi (trait, object safe)
//!    |
//!    v
//! GithubClient  (reqwest, bearer token)
//!    GET  /repos/{org}/{repo}            200 -> Some, 404 -> None
//!    POST /orgs/{org}/repos              {name, private: true} -> html_url
//!    GET  /repos/{org}/{repo}/branches   per_page=100, page=1..
//!
//! Transport failure / 5xx --> NetworkError::Transient (retryable)
//! Creation failure        --> RepoError::Creation
//! ```

use futures_util::future::BoxFuture;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::types::GithubConfig;
use crate::error::{NetworkError, RepoError, TmResult};
use crate::net::{status_error, transport_error};
use crate::tm::TmId;

const PAGE_SIZE: usize = 100;

/// A repository as reported by the hosting service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepo {
    pub name: String,
    /// Browser URL of the repository.
    pub html_url: String,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub private: bool,
}

#[derive(Debug, Deserialize)]
struct BranchEntry {
    name: String,
}

#[derive(Debug, Serialize)]
struct CreateRepoRequest<'a> {
    name: &'a str,
    private: bool,
}

/// Admin operations on the organization that owns the TM repositories.
pub trait HostApi: Send + Sync {
    /// Look a repository up by name; `None` when it does not exist.
    fn find_repo<'a>(&'a self, repo: &'a TmId) -> BoxFuture<'a, TmResult<Option<RemoteRepo>>>;

    /// Whether the repository exists.
    fn repo_exists<'a>(&'a self, repo: &'a TmId) -> BoxFuture<'a, TmResult<bool>> {
        Box::pin(async move { Ok(self.find_repo(repo).await?.is_some()) })
    }

    /// Create an empty private repository.
    fn create_repo<'a>(&'a self, repo: &'a TmId) -> BoxFuture<'a, TmResult<RemoteRepo>>;

    /// Every branch name of the repository.
    fn list_branches<'a>(&'a self, repo: &'a TmId) -> BoxFuture<'a, TmResult<Vec<String>>>;
}

/// [`HostApi`] over the GitHub REST API.
#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    api_url: String,
    org: String,
    token: String,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("api_url", &self.api_url)
            .field("org", &self.org)
            .finish_non_exhaustive()
    }
}

impl GithubClient {
    /// Client for the organization and endpoint in `config`.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::Reqwest` if the HTTP client cannot be built.
    pub fn new(config: &GithubConfig) -> TmResult<Self> {
        let client = Client::builder()
            .user_agent(format!("tm-rs/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(NetworkError::Reqwest)?;
        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            org: config.org.clone(),
            token: config.token.clone(),
        })
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.header("Accept", "application/vnd.github+json");
        if self.token.is_empty() {
            request
        } else {
            request.bearer_auth(&self.token)
        }
    }

    async fn get(&self, url: &str) -> TmResult<Response> {
        self.authorized(self.client.get(url))
            .send()
            .await
            .map_err(|e| transport_error(url, &e).into())
    }
}

/// Human-readable reason from a GitHub error body; the raw body when it is
/// not the usual `{message, errors: [{message}]}` shape.
fn api_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };
    let mut parts: Vec<&str> = value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .into_iter()
        .collect();
    if let Some(errors) = value.get("errors").and_then(serde_json::Value::as_array) {
        parts.extend(
            errors
                .iter()
                .filter_map(|e| e.get("message").and_then(serde_json::Value::as_str)),
        );
    }
    if parts.is_empty() {
        body.trim().to_string()
    } else {
        parts.join(": ")
    }
}

impl HostApi for GithubClient {
    fn find_repo<'a>(&'a self, repo: &'a TmId) -> BoxFuture<'a, TmResult<Option<RemoteRepo>>> {
        Box::pin(async move {
            let url = format!("{}/repos/{}/{repo}", self.api_url, self.org);
            debug!(repo = %repo, "checking repository existence");

            let response = self.get(&url).await?;
            match response.status() {
                StatusCode::NOT_FOUND => Ok(None),
                status if status.is_success() => {
                    let found = response
                        .json::<RemoteRepo>()
                        .await
                        .map_err(NetworkError::Reqwest)?;
                    Ok(Some(found))
                }
                status => Err(status_error(status, &url).into()),
            }
        })
    }

    fn create_repo<'a>(&'a self, repo: &'a TmId) -> BoxFuture<'a, TmResult<RemoteRepo>> {
        Box::pin(async move {
            let url = format!("{}/orgs/{}/repos", self.api_url, self.org);
            let creation = |message: String| RepoError::Creation {
                repo: repo.to_string(),
                message,
            };

            let response = self
                .authorized(self.client.post(&url))
                .json(&CreateRepoRequest {
                    name: repo.as_str(),
                    private: true,
                })
                .send()
                .await
                .map_err(|e| creation(format!("request to {url} failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let reason = api_message(&body);
                return Err(creation(format!("{url} answered {status}: {reason}")).into());
            }

            let created = response
                .json::<RemoteRepo>()
                .await
                .map_err(|e| creation(format!("unreadable response: {e}")))?;
            info!(repo = %repo, url = %created.html_url, "repository created");
            Ok(created)
        })
    }

    fn list_branches<'a>(&'a self, repo: &'a TmId) -> BoxFuture<'a, TmResult<Vec<String>>> {
        Box::pin(async move {
            let base = format!("{}/repos/{}/{repo}/branches", self.api_url, self.org);
            let mut names = Vec::new();

            for page in 1.. {
                let url = format!("{base}?per_page={PAGE_SIZE}&page={page}");
                let response = self.get(&url).await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(status_error(status, &base).into());
                }
                let entries = response
                    .json::<Vec<BranchEntry>>()
                    .await
                    .map_err(NetworkError::Reqwest)?;
                let last_page = entries.len() < PAGE_SIZE;
                names.extend(entries.into_iter().map(|entry| entry.name));
                if last_page {
                    break;
                }
            }

            debug!(repo = %repo, count = names.len(), "listed branches");
            Ok(names)
        })
    }
}
