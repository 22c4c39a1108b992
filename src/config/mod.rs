// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for tm-rs.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. tm.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. TM_* env vars
//! 5. CLI overrides (--set, --github-*, legacy GITHUB_* env)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! TM_GITHUB__ORG=MonlamAI           → github.org = "MonlamAI"
//! TM_GITHUB__API_URL=http://..      → github.api_url = "http://.."
//! TM_TM__INITIAL_VERSION=legacy     → tm.initial_version = "legacy"
//! ```
//!
//! `__` separates sections so keys may keep their underscores.

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

use loader::ConfigLoader;
use types::{AlignerConfig, GithubConfig, GlobalConfig, TmConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Remote host and credentials.
    pub github: GithubConfig,
    /// TM workflow options.
    pub tm: TmConfig,
    /// External aligner.
    pub aligner: AlignerConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tm_rs::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("tm.toml")
    ///     .with_env_prefix("TM")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Format configuration options for display.
    ///
    /// The token is shown as `[hidden]`. Output is ordered by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_github_options(&mut options);
        self.format_tm_options(&mut options);
        self.format_aligner_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".into(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert("global.log_json".into(), self.global.log_json.to_string());
    }

    fn format_github_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("github.org".into(), self.github.org.clone());
        options.insert("github.username".into(), self.github.username.clone());
        options.insert("github.email".into(), self.github.email.clone());
        if !self.github.token.is_empty() {
            options.insert("github.token".into(), "[hidden]".into());
        }
        options.insert("github.api_url".into(), self.github.api_url.clone());
        options.insert("github.git_url".into(), self.github.git_url.clone());
        options.insert(
            "github.default_branch".into(),
            self.github.default_branch.clone(),
        );
        options.insert(
            "github.propagation_delay_secs".into(),
            self.github.propagation_delay_secs.to_string(),
        );
    }

    fn format_tm_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "tm.initial_version".into(),
            self.tm.initial_version.to_string(),
        );
        options.insert(
            "tm.guard_concurrent_updates".into(),
            self.tm.guard_concurrent_updates.to_string(),
        );
        options.insert("tm.web_ide_url".into(), self.tm.web_ide_url.clone());
        options.insert("tm.commit_message".into(), self.tm.commit_message.clone());
        options.insert(
            "tm.scratch_dir".into(),
            self.tm
                .scratch_dir
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
    }

    fn format_aligner_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("aligner.command".into(), self.aligner.command.clone());
        options.insert("aligner.args".into(), self.aligner.args.join(" "));
    }
}
