// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Read-only commands against the host.

use crate::cli::tm::TextIdArgs;
use crate::config::Config;
use crate::error::Result;
use crate::tm::TmId;
use crate::tm::service::TmService;

/// Print `true` or `false` depending on whether the TM exists.
///
/// # Errors
///
/// Returns an error if the text id is invalid or the host cannot be asked.
pub async fn run_exists_command(args: &TextIdArgs, config: &Config) -> Result<()> {
    let tm_id = TmId::from_text_id(&args.text_id)?;
    let service = TmService::from_config(config)?;
    let exists = service.gateway().exists(&tm_id).await?;
    println!("{exists}");
    Ok(())
}

/// Print the label the next update would get, or nothing when the TM does
/// not exist yet (its first publish creates it).
///
/// # Errors
///
/// Returns an error if the text id is invalid or the host cannot be asked.
pub async fn run_next_version_command(args: &TextIdArgs, config: &Config) -> Result<()> {
    let tm_id = TmId::from_text_id(&args.text_id)?;
    let service = TmService::from_config(config)?;
    match service.preview_next_version(&tm_id).await? {
        Some(version) => println!("{version}"),
        None => eprintln!("{tm_id} does not exist; publishing would create it"),
    }
    Ok(())
}
