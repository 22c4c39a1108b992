// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Align command: download, align and publish in one go.

use anyhow::Context;
use tracing::info;

use super::cancel_on_ctrl_c;
use crate::aligner::{CommandAligner, align_and_publish};
use crate::cli::tm::AlignArgs;
use crate::config::Config;
use crate::error::Result;
use crate::tm::service::TmService;

/// Main handler for the align command. Prints the repository URL.
///
/// # Errors
///
/// Returns an error if the configuration lacks credentials, a download or
/// the aligner fails, or publishing fails.
pub async fn run_align_command(args: &AlignArgs, config: &Config) -> Result<()> {
    let service = TmService::from_config(config)?;
    let aligner = CommandAligner::new(&config.aligner);
    let provenance = args.source.provenance();
    let token = cancel_on_ctrl_c();

    // Dropping the scratch directory removes it.
    let scratch;
    let work_dir = if let Some(dir) = &args.work_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create {}", dir.display()))?;
        dir.clone()
    } else {
        scratch = service.scratch_dir("align").await?;
        scratch.path().to_path_buf()
    };

    let outcome = align_and_publish(&service, &aligner, &provenance, &work_dir, token)
        .await
        .with_context(|| format!("failed to align and publish text {}", args.source.text_id))?;

    info!(%outcome, "done");
    println!("{}", outcome.url);
    Ok(())
}
