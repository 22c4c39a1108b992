// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE       ← Additional config files (can repeat)
//! --log-level N       ← Console verbosity (0-6)
//! --file-log-level    ← File verbosity (overrides --log-level)
//! --log-file FILE     ← Enables file logging
//! --log-json          ← JSON console lines
//! --set KEY=VAL       ← Direct config override
//! --github-*          ← Credentials; fall back to the legacy env names
//!
//! Precedence: CLI flags > --set > TM_* env > --config > tm.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Emit console logs as JSON lines.
    #[arg(long = "log-json")]
    pub log_json: bool,

    /// Sets an option, such as 'tm/initial_version=explicit'.
    /// Can be specified multiple times.
    #[arg(short = 's', long = "set", value_name = "OPTION", action = clap::ArgAction::Append)]
    pub options: Vec<String>,

    /// Disables auto loading of tm.toml, only uses --config.
    #[arg(long = "no-default-config")]
    pub no_default_config: bool,

    /// GitHub credentials.
    #[command(flatten)]
    pub github: GithubOptions,
}

/// Host credentials, also taken from the environment.
#[derive(Debug, Clone, Default, Args)]
pub struct GithubOptions {
    /// Organization owning the TM repositories.
    #[arg(long = "github-org", env = "MAI_GITHUB_ORG", value_name = "ORG")]
    pub org: Option<String>,

    /// Account used for pushes and commit authorship.
    #[arg(long = "github-username", env = "GITHUB_USERNAME", value_name = "USER")]
    pub username: Option<String>,

    /// Commit author email.
    #[arg(long = "github-email", env = "GITHUB_EMAIL", value_name = "EMAIL")]
    pub email: Option<String>,

    /// Personal access token.
    #[arg(
        long = "github-token",
        env = "GITHUB_TOKEN",
        value_name = "TOKEN",
        hide_env_values = true
    )]
    pub token: Option<String>,
}

impl GlobalOptions {
    /// Converts command-line options to configuration overrides.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        let mut overrides = self.options.clone();

        if let Some(level) = self.log_level {
            overrides.push(format!("global/output_log_level={level}"));
        }

        // file_log_level falls back to log_level if not specified
        if let Some(level) = self.file_log_level.or(self.log_level) {
            overrides.push(format!("global/file_log_level={level}"));
        }

        if let Some(ref path) = self.log_file {
            overrides.push(format!("global/log_file={}", path.display()));
        }

        if self.log_json {
            overrides.push("global/log_json=true".to_string());
        }

        let github = [
            ("org", &self.github.org),
            ("username", &self.github.username),
            ("email", &self.github.email),
            ("token", &self.github.token),
        ];
        for (key, value) in github {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                overrides.push(format!("github/{key}={value}"));
            }
        }

        overrides
    }
}
