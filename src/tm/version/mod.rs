// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Version resolution.
//!
//! ```text
//! ["main", "v1", "v2", "v9", "feature"]
//!          |
//!          v  keep ^v[1-9][0-9]*$
//!     [1, 2, 9] --> max 9 --> v10      (numeric, not lexical)
//!     []        --> v1
//! ```
//!
//! Labels are compared on their digits (length first, then lexically), so a
//! label too large for `u64` still counts as the maximum. Resolving past
//! such a label is an error rather than a reused or dropped version.

use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ConfigError, RepoError};

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^v([1-9][0-9]*)$").unwrap_or_else(|_| unreachable!("static pattern"))
    })
}

/// Digits of a version label, without the `v`.
fn version_digits(name: &str) -> Option<&str> {
    version_pattern()
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|digits| digits.as_str())
}

/// Numeric order of two digit strings without leading zeros.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// A TM version label, `v{N}` with N >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TmVersion(u64);

impl TmVersion {
    pub const INITIAL: Self = Self(1);

    /// `None` for 0.
    #[must_use]
    pub const fn new(number: u64) -> Option<Self> {
        if number == 0 { None } else { Some(Self(number)) }
    }

    #[must_use]
    pub const fn number(self) -> u64 {
        self.0
    }

    /// The following version; `None` once `u64` is exhausted.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(number) => Some(Self(number)),
            None => None,
        }
    }

    /// Parse a branch name; `None` unless it is a version label that fits
    /// in `u64`.
    #[must_use]
    pub fn from_branch(name: &str) -> Option<Self> {
        version_digits(name)
            .and_then(|digits| digits.parse().ok())
            .and_then(Self::new)
    }

    /// The branch name of this version.
    #[must_use]
    pub fn label(self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for TmVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl std::str::FromStr for TmVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_branch(s).ok_or_else(|| ConfigError::InvalidValue {
            section: "tm".to_string(),
            key: "version".to_string(),
            message: format!("expected a label like 'v3', got '{s}'"),
        })
    }
}

/// Highest version among `branches`, if any.
///
/// # Errors
///
/// Returns `RepoError::VersionsExhausted` when the highest label does not
/// fit in `u64`.
pub fn latest_version<I, S>(branches: I) -> Result<Option<TmVersion>, RepoError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut latest: Option<String> = None;
    for name in branches {
        if let Some(digits) = version_digits(name.as_ref())
            && latest
                .as_deref()
                .is_none_or(|current| cmp_digits(digits, current).is_gt())
        {
            latest = Some(digits.to_string());
        }
    }

    latest
        .map(|digits| {
            digits
                .parse()
                .ok()
                .and_then(TmVersion::new)
                .ok_or(RepoError::VersionsExhausted {
                    latest: format!("v{digits}"),
                })
        })
        .transpose()
}

/// Version the next snapshot gets, given the existing branch names.
///
/// The result is always greater than every existing version.
///
/// # Errors
///
/// Returns `RepoError::VersionsExhausted` when the highest existing version
/// has no successor.
pub fn next_version<I, S>(branches: I) -> Result<TmVersion, RepoError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match latest_version(branches)? {
        None => Ok(TmVersion::INITIAL),
        Some(latest) => latest.next().ok_or_else(|| RepoError::VersionsExhausted {
            latest: latest.label(),
        }),
    }
}

/// Like [`next_version`] but never below `floor`.
///
/// # Errors
///
/// Same as [`next_version`].
pub fn next_version_from<I, S>(branches: I, floor: TmVersion) -> Result<TmVersion, RepoError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    next_version(branches).map(|next| next.max(floor))
}
