// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   config (options, configs), publish, align, query (exists, next-version)
//! ```

pub mod align;
pub mod config;
pub mod publish;
pub mod query;

use tokio_util::sync::CancellationToken;

/// Token cancelled on the first Ctrl+C.
pub(crate) fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let cancel_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, cancelling...");
            cancel_token.cancel();
        }
    });
    token
}
