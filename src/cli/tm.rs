// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments of the TM commands.
//!
//! ```text
//! publish --alignment FILE  <source>
//! align   [--work-dir DIR]  <source>
//! exists        TEXT_ID
//! next-version  TEXT_ID
//!
//! <source> = --text-id ID --bo-url URL --en-url URL
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::tm::Provenance;

/// Where the texts of a TM come from.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Identifier of the source text; the TM is named `TM{ID}`.
    #[arg(long = "text-id", value_name = "ID")]
    pub text_id: String,

    /// Raw URL of the Tibetan source file.
    #[arg(long = "bo-url", value_name = "URL")]
    pub bo_url: String,

    /// Raw URL of the English target file.
    #[arg(long = "en-url", value_name = "URL")]
    pub en_url: String,
}

impl SourceArgs {
    #[must_use]
    pub fn provenance(&self) -> Provenance {
        Provenance::builder()
            .text_id(self.text_id.as_str())
            .source_file_url(self.bo_url.as_str())
            .target_file_url(self.en_url.as_str())
            .build()
    }
}

/// Arguments for the `publish` command.
#[derive(Debug, Clone, Default, Args)]
pub struct PublishArgs {
    /// Tab-separated alignment file.
    #[arg(short = 'a', long = "alignment", value_name = "FILE")]
    pub alignment: PathBuf,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for the `align` command.
#[derive(Debug, Clone, Default, Args)]
pub struct AlignArgs {
    /// Keep downloads and aligner output in DIR instead of a scratch
    /// directory that is removed afterwards.
    #[arg(short = 'w', long = "work-dir", value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// A single text id.
#[derive(Debug, Clone, Default, Args)]
pub struct TextIdArgs {
    /// Identifier of the source text.
    #[arg(value_name = "TEXT_ID")]
    pub text_id: String,
}
