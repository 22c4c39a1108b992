// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Publish command: an existing alignment file becomes a TM version.

use anyhow::Context;
use tracing::info;

use super::cancel_on_ctrl_c;
use crate::cli::tm::PublishArgs;
use crate::config::Config;
use crate::error::Result;
use crate::tm::service::TmService;

/// Main handler for the publish command. Prints the repository URL.
///
/// # Errors
///
/// Returns an error if the configuration lacks credentials or any publish
/// step fails.
pub async fn run_publish_command(args: &PublishArgs, config: &Config) -> Result<()> {
    let service = TmService::from_config(config)?;
    let provenance = args.source.provenance();
    let token = cancel_on_ctrl_c();

    let outcome = service
        .create_or_update_with_cancellation(&args.alignment, &provenance, token)
        .await
        .with_context(|| format!("failed to publish {}", args.alignment.display()))?;

    info!(%outcome, "done");
    println!("{}", outcome.url);
    Ok(())
}
