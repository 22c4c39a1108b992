// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sentence aligner adapter and the fetch-align-publish pipeline.
//!
//! ```text
//! align_and_publish(service, aligner, provenance)
//!   Downloader  source url --> {work}/{text_id}-bo.txt
//!   Downloader  target url --> {work}/{text_id}-en.txt
//!   Aligner     {command} {args..} bo.txt en.txt work   (cwd = work)
//!                 stdout: ... "[OUTPUT] path/to/alignment.txt"
//!   TmService   create_or_update(alignment, provenance)
//! ```

use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::types::AlignerConfig;
use crate::core::process::builder::ProcessBuilder;
use crate::error::{FsError, ProcessError, TmError, TmResult};
use crate::net::Downloader;
use crate::tm::Provenance;
use crate::tm::service::{TmOutcome, TmService};

/// Prefix of the stdout line that names the alignment file.
pub const OUTPUT_MARKER: &str = "[OUTPUT]";

/// Produces an alignment file from a source and a target text.
pub trait Aligner: Send + Sync {
    /// Align `source` with `target` inside `work_dir`; returns the path of
    /// the alignment file.
    fn align<'a>(
        &'a self,
        source: &'a Path,
        target: &'a Path,
        work_dir: &'a Path,
        token: CancellationToken,
    ) -> BoxFuture<'a, TmResult<PathBuf>>;
}

/// Path announced by the last `[OUTPUT]` line of `stdout`.
#[must_use]
pub fn parse_output_marker(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix(OUTPUT_MARKER))
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}

/// [`Aligner`] backed by an external command.
#[derive(Debug, Clone)]
pub struct CommandAligner {
    command: String,
    args: Vec<String>,
}

impl CommandAligner {
    #[must_use]
    pub fn new(config: &AlignerConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
        }
    }
}

impl Aligner for CommandAligner {
    fn align<'a>(
        &'a self,
        source: &'a Path,
        target: &'a Path,
        work_dir: &'a Path,
        token: CancellationToken,
    ) -> BoxFuture<'a, TmResult<PathBuf>> {
        Box::pin(async move {
            let output = ProcessBuilder::which(&self.command)?
                .args(&self.args)
                .arg(source)
                .arg(target)
                .arg(work_dir)
                .cwd(work_dir)
                .name("aligner")
                .run_with_cancellation(token)
                .await?;
            if output.is_interrupted() {
                return Err(TmError::Cancelled);
            }

            let path = parse_output_marker(output.stdout()).ok_or_else(|| {
                ProcessError::MissingOutput {
                    command: self.command.clone(),
                }
            })?;
            let path = if path.is_relative() {
                work_dir.join(path)
            } else {
                path
            };

            tokio::fs::metadata(&path)
                .await
                .map_err(|e| FsError::io(&path, e))?;
            debug!(path = %path.display(), "alignment produced");
            Ok(path)
        })
    }
}

/// Download both texts, align them and publish the result.
///
/// Everything is written below `work_dir`.
///
/// # Errors
///
/// Fails with the error of the first step that fails; a cancelled token
/// yields [`TmError::Cancelled`].
pub async fn align_and_publish(
    service: &TmService,
    aligner: &dyn Aligner,
    provenance: &Provenance,
    work_dir: &Path,
    token: CancellationToken,
) -> TmResult<TmOutcome> {
    // Reject a bad text id before anything is downloaded.
    let tm_id = provenance.tm_id()?;
    let text_id = &provenance.text_id;
    let source = work_dir.join(format!("{text_id}-bo.txt"));
    let target = work_dir.join(format!("{text_id}-en.txt"));

    for (url, path) in [
        (&provenance.source_file_url, &source),
        (&provenance.target_file_url, &target),
    ] {
        Downloader::new()
            .url(url.as_str())
            .file(path.as_path())
            .cancellation(token.clone())
            .download()
            .await?;
    }
    info!(tm = %tm_id, "texts downloaded, aligning");

    let alignment = aligner
        .align(&source, &target, work_dir, token.clone())
        .await?;

    service
        .create_or_update_with_cancellation(&alignment, provenance, token)
        .await
}

#[cfg(test)]
mod tests;
