// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! TM layout builder.
//!
//! ```text
//! {dir}/
//!   {TmId}-bo.txt   source segments, one per line
//!   {TmId}-en.txt   target segments, line i <-> line i
//!   README.md       "## Input" + two web IDE links
//! ```
//!
//! Raw-content links are rewritten for the web IDE:
//!
//! ```text
//! https://raw.githubusercontent.com/OpenPecha/tibetan-aligner/main/tests/data/text-bo.txt
//! https://github.dev/OpenPecha/tibetan-aligner/blob/main/tests/data/text-bo.txt
//! ```

use std::path::{Path, PathBuf};

use reqwest::Url;
use tracing::{debug, warn};

use super::alignment::{AlignmentPair, UNALIGNED_TARGET};
use super::{Provenance, TmId};
use crate::error::{FsError, TmResult};

pub const README_FILE: &str = "README.md";

/// The files of one TM snapshot, ready to be committed.
#[derive(Debug, Clone)]
pub struct TmLayout {
    tm_id: TmId,
    dir: PathBuf,
    source_file: PathBuf,
    target_file: PathBuf,
    readme: PathBuf,
    pair_count: usize,
}

impl TmLayout {
    #[must_use]
    pub const fn tm_id(&self) -> &TmId {
        &self.tm_id
    }

    /// Directory holding the snapshot.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    #[must_use]
    pub fn target_file(&self) -> &Path {
        &self.target_file
    }

    #[must_use]
    pub fn readme(&self) -> &Path {
        &self.readme
    }

    /// Number of lines in each per-language file.
    #[must_use]
    pub const fn pair_count(&self) -> usize {
        self.pair_count
    }

    /// Every file of the snapshot, in commit order.
    #[must_use]
    pub fn files(&self) -> Vec<PathBuf> {
        vec![
            self.source_file.clone(),
            self.target_file.clone(),
            self.readme.clone(),
        ]
    }
}

/// Per-language file name for a TM.
#[must_use]
pub fn segment_file_name(tm_id: &TmId, lang: &str) -> String {
    format!("{tm_id}-{lang}.txt")
}

/// Rewrite a raw-content URL into a web IDE URL.
///
/// The URL is parsed only to validate it. The output keeps the original
/// text after the host, so non-ASCII paths, percent escapes, the query and
/// the fragment come through as written; only the first `main` path
/// segment becomes `blob/main`.
///
/// Returns `None` when the URL cannot be parsed or has no host.
#[must_use]
pub fn web_ide_url(raw_url: &str, web_ide_base: &str) -> Option<String> {
    let raw_url = raw_url.trim();
    let url = Url::parse(raw_url).ok()?;
    url.host_str()?;

    let (_, after_scheme) = raw_url.split_once("://")?;
    let authority_end = after_scheme
        .find(['/', '?', '#'])
        .unwrap_or(after_scheme.len());
    let rest = &after_scheme[authority_end..];
    let path_end = rest.find(['?', '#']).unwrap_or(rest.len());
    let (path, tail) = rest.split_at(path_end);

    let mut rewritten = false;
    let segments: Vec<&str> = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| {
            if !rewritten && segment == "main" {
                rewritten = true;
                "blob/main"
            } else {
                segment
            }
        })
        .collect();

    Some(format!(
        "{}/{}{tail}",
        web_ide_base.trim_end_matches('/'),
        segments.join("/")
    ))
}

/// Writes TM layouts.
#[derive(Debug, Clone)]
pub struct LayoutBuilder {
    web_ide_base: String,
}

impl LayoutBuilder {
    #[must_use]
    pub fn new(web_ide_base: impl Into<String>) -> Self {
        Self {
            web_ide_base: web_ide_base.into(),
        }
    }

    fn view_url(&self, raw_url: &str) -> String {
        web_ide_url(raw_url, &self.web_ide_base).unwrap_or_else(|| {
            warn!(url = raw_url, "cannot rewrite provenance url, keeping it verbatim");
            raw_url.to_string()
        })
    }

    /// README body; no trailing newline.
    #[must_use]
    pub fn render_readme(&self, provenance: &Provenance) -> String {
        let text_id = &provenance.text_id;
        format!(
            "## Input\n- [BO{text_id}]({})\n- [EN{text_id}]({})",
            self.view_url(&provenance.source_file_url),
            self.view_url(&provenance.target_file_url),
        )
    }

    /// Materialize `pairs` and `provenance` under `dir`.
    ///
    /// The directory is created if needed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an unusable text id and
    /// `FsError::IoError` if `dir` is not writable.
    pub async fn build(
        &self,
        pairs: &[AlignmentPair],
        provenance: &Provenance,
        dir: &Path,
    ) -> TmResult<TmLayout> {
        let tm_id = provenance.tm_id()?;

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| FsError::io(dir, e))?;

        let (source_text, target_text) = render_segments(pairs);
        let layout = TmLayout {
            dir: dir.to_path_buf(),
            source_file: dir.join(segment_file_name(&tm_id, "bo")),
            target_file: dir.join(segment_file_name(&tm_id, "en")),
            readme: dir.join(README_FILE),
            pair_count: pairs.len(),
            tm_id,
        };

        write_file(&layout.source_file, source_text.as_bytes()).await?;
        write_file(&layout.target_file, target_text.as_bytes()).await?;
        write_file(&layout.readme, self.render_readme(provenance).as_bytes()).await?;

        debug!(
            tm_id = %layout.tm_id,
            dir = %layout.dir.display(),
            pairs = layout.pair_count,
            "layout written"
        );
        Ok(layout)
    }
}

async fn write_file(path: &Path, contents: &[u8]) -> TmResult<()> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| FsError::io(path, e).into())
}

fn push_line(buf: &mut String, segment: &str) {
    // The placeholder already is the line terminator.
    if segment != UNALIGNED_TARGET {
        buf.push_str(segment);
    }
    buf.push('\n');
}

fn render_segments(pairs: &[AlignmentPair]) -> (String, String) {
    let mut source = String::new();
    let mut target = String::new();
    for pair in pairs {
        push_line(&mut source, &pair.source);
        push_line(&mut target, &pair.target);
    }
    (source, target)
}
