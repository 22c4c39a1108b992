// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for tm-rs.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, GithubConfig, TmConfig, AlignerConfig
//! InitialVersion: implicit (default) | explicit | legacy
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file; no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Emit console logs as JSON.
    pub log_json: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
            log_json: false,
        }
    }
}

/// Remote host settings and credentials.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GithubConfig {
    /// Organization that owns every TM repository.
    pub org: String,
    /// Account used in remote URLs and for commit authorship.
    pub username: String,
    /// Commit author email.
    pub email: String,
    /// Personal access token.
    pub token: String,
    /// Administrative API base URL.
    pub api_url: String,
    /// Base URL that git clones and pushes go to.
    pub git_url: String,
    /// Branch holding the initial snapshot.
    pub default_branch: String,
    /// Seconds to wait after creating a repository before the first push.
    pub propagation_delay_secs: u64,
}

// Hand-written so the token never ends up in a debug dump.
impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("org", &self.org)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("token", &if self.token.is_empty() { "" } else { "[hidden]" })
            .field("api_url", &self.api_url)
            .field("git_url", &self.git_url)
            .field("default_branch", &self.default_branch)
            .field("propagation_delay_secs", &self.propagation_delay_secs)
            .finish()
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            org: String::new(),
            username: String::new(),
            email: String::new(),
            token: String::new(),
            api_url: "https://api.github.com".to_string(),
            git_url: "https://github.com".to_string(),
            default_branch: "main".to_string(),
            propagation_delay_secs: 3,
        }
    }
}

impl GithubConfig {
    #[must_use]
    pub const fn propagation_delay(&self) -> Duration {
        Duration::from_secs(self.propagation_delay_secs)
    }

    /// Git identity used for commits: the username, falling back to the org.
    #[must_use]
    pub fn author_name(&self) -> &str {
        if self.username.is_empty() {
            &self.org
        } else {
            &self.username
        }
    }

    /// Git identity email; a noreply address is derived when unset.
    #[must_use]
    pub fn author_email(&self) -> String {
        if self.email.is_empty() {
            format!("{}@users.noreply.github.com", self.author_name())
        } else {
            self.email.clone()
        }
    }

    /// Check the keys every host operation needs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` for an empty `org` or `token`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [("org", &self.org), ("token", &self.token)] {
            if value.is_empty() {
                return Err(ConfigError::MissingKey {
                    section: "github".to_string(),
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// How the initial snapshot of a repository is labeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialVersion {
    /// The default branch is `v1`; the first update is `v2`.
    #[default]
    Implicit,
    /// Creation also pushes a `v1` branch.
    Explicit,
    /// No `v1` branch; the first update is labeled `v1`.
    Legacy,
}

impl InitialVersion {
    /// Lowest version number an update may receive.
    #[must_use]
    pub const fn update_floor(self) -> u32 {
        match self {
            Self::Implicit | Self::Explicit => 2,
            Self::Legacy => 1,
        }
    }
}

impl std::fmt::Display for InitialVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Implicit => write!(f, "implicit"),
            Self::Explicit => write!(f, "explicit"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

impl std::str::FromStr for InitialVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "implicit" => Ok(Self::Implicit),
            "explicit" => Ok(Self::Explicit),
            "legacy" => Ok(Self::Legacy),
            _ => Err(ConfigError::InvalidValue {
                section: "tm".to_string(),
                key: "initial_version".to_string(),
                message: format!("expected 'implicit', 'explicit', or 'legacy', got '{s}'"),
            }),
        }
    }
}

/// Translation memory workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TmConfig {
    /// Labeling of the initial snapshot.
    pub initial_version: InitialVersion,
    /// Re-check upstream branches right before pushing a version.
    pub guard_concurrent_updates: bool,
    /// Web IDE base used for README provenance links.
    pub web_ide_url: String,
    /// Commit message of version branches.
    pub commit_message: String,
    /// Root for scratch directories; the system temp dir when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,
}

impl Default for TmConfig {
    fn default() -> Self {
        Self {
            initial_version: InitialVersion::default(),
            guard_concurrent_updates: true,
            web_ide_url: "https://github.dev".to_string(),
            commit_message: "added alignment".to_string(),
            scratch_dir: None,
        }
    }
}

/// External aligner invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlignerConfig {
    /// Executable name or path.
    pub command: String,
    /// Arguments placed before the input paths.
    pub args: Vec<String>,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            command: "tibetan-aligner".to_string(),
            args: Vec::new(),
        }
    }
}
