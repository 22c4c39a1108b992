// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Alignment parser.
//!
//! ```text
//! "bo1\ten1\n\nbo2\ten\t2\nbo3"
//!      |
//!      v  split on '\n', strip '\r', skip empty lines
//!   ("bo1", "en1")
//!   ("bo2", "en\t2")     first tab only
//!   ("bo3", "\n")        no tab: placeholder target
//! ```
//!
//! Source segments get the double shad `།།` spaced out to `། །`.

use std::path::Path;

use tracing::debug;

use crate::error::{AlignmentError, FsError, TmResult};

/// Target segment of a line the aligner could not pair.
pub const UNALIGNED_TARGET: &str = "\n";

const SHAD: char = '།';

/// One aligned segment pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentPair {
    pub source: String,
    pub target: String,
}

impl AlignmentPair {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Whether the aligner left this source segment without a target.
    #[must_use]
    pub fn is_unaligned(&self) -> bool {
        self.target == UNALIGNED_TARGET
    }
}

/// Put a space between every two adjacent shads.
///
/// Idempotent: the output never contains `།།`.
#[must_use]
pub fn normalize_source(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len() + 4);
    let mut prev = None;
    for c in segment.chars() {
        if c == SHAD && prev == Some(SHAD) {
            out.push(' ');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

fn parse_line(line: &str) -> AlignmentPair {
    match line.split_once('\t') {
        Some((source, target)) => AlignmentPair::new(normalize_source(source), target),
        None => AlignmentPair::new(normalize_source(line), UNALIGNED_TARGET),
    }
}

/// Parse raw aligner output.
///
/// `source_name` identifies the input in errors. The input is validated as
/// UTF-8 as a whole and then split by [`parse_str`].
///
/// # Errors
///
/// Returns `AlignmentError::MalformedLine` for the first line that is not
/// valid UTF-8; nothing is returned for the lines before it.
pub fn parse(source_name: &str, raw: &[u8]) -> TmResult<Vec<AlignmentPair>> {
    let text = std::str::from_utf8(raw).map_err(|e| {
        let (before, after) = raw.split_at(e.valid_up_to());
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |pos| pos + 1);
        let line_end = after
            .iter()
            .position(|&b| b == b'\n')
            .map_or(raw.len(), |pos| before.len() + pos);
        let line = &raw[line_start..line_end];
        AlignmentError::MalformedLine {
            file: source_name.to_string(),
            line_number: before.iter().filter(|&&b| b == b'\n').count() + 1,
            content: String::from_utf8_lossy(line.strip_suffix(b"\r").unwrap_or(line))
                .into_owned(),
        }
    })?;

    let pairs = parse_str(text);
    debug!(source = source_name, pairs = pairs.len(), "parsed alignment");
    Ok(pairs)
}

/// Parse alignment text that is already decoded.
///
/// Lines are split on `\n` with a trailing `\r` dropped; empty lines are
/// skipped.
#[must_use]
pub fn parse_str(raw: &str) -> Vec<AlignmentPair> {
    raw.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}

/// Read and parse an alignment file.
///
/// # Errors
///
/// Returns `FsError::IoError` if the file cannot be read, or
/// `AlignmentError::MalformedLine` naming the file.
pub async fn load(path: &Path) -> TmResult<Vec<AlignmentPair>> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| FsError::io(path, e))?;
    parse(&path.display().to_string(), &raw)
}

#[cfg(test)]
mod tests;
