// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Translation memory domain: parsing, layout, versioning, orchestration.
//!
//! ```text
//! alignment.txt --> alignment::parse --> Vec<AlignmentPair>
//!                                             |
//!                                             v
//!                  Provenance --> layout::build --> TmLayout (scratch dir)
//!                                             |
//!                                             v
//!                          service::TmService::create_or_update
//!                            absent  --> gateway.create_repository
//!                            present --> gateway.clone_repository
//!                                        version::next_version_from
//!                                        gateway.commit_version
//! ```
//!
//! # Key Types
//!
//! | Type         | Purpose                                      |
//! |--------------|----------------------------------------------|
//! | `TmId`       | `TM{text_id}`, repository name and TM handle |
//! | `Provenance` | text id plus the two source file URLs        |
//! | `TmVersion`  | `v{N}` branch label                          |
//! | `TmLayout`   | the three files committed for one snapshot   |

pub mod alignment;
pub mod layout;
pub mod service;
pub mod version;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Identifier of a translation memory, also its repository name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TmId(String);

impl TmId {
    const PREFIX: &'static str = "TM";

    /// Build the identifier for a source text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the text id is empty or holds
    /// characters that are not allowed in a repository name.
    pub fn from_text_id(text_id: &str) -> Result<Self, ConfigError> {
        let valid = !text_id.is_empty()
            && text_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(ConfigError::InvalidValue {
                section: "input".to_string(),
                key: "text_id".to_string(),
                message: format!(
                    "'{text_id}' must be non-empty and use only A-Z, a-z, 0-9, '-', '_' or '.'"
                ),
            });
        }
        Ok(Self(format!("{}{text_id}", Self::PREFIX)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The text id this TM was built from.
    #[must_use]
    pub fn text_id(&self) -> &str {
        &self.0[Self::PREFIX.len()..]
    }
}

impl std::fmt::Display for TmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TmId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Where the aligned texts came from; rendered into the README.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
pub struct Provenance {
    #[builder(into)]
    pub text_id: String,
    /// Raw URL of the Tibetan source file.
    #[builder(into)]
    pub source_file_url: String,
    /// Raw URL of the English target file.
    #[builder(into)]
    pub target_file_url: String,
}

impl Provenance {
    /// Identifier of the TM this provenance belongs to.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an unusable text id.
    pub fn tm_id(&self) -> Result<TmId, ConfigError> {
        TmId::from_text_id(&self.text_id)
    }
}
