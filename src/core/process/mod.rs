// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and management.
//!
//! ```text
//! ProcessBuilder::which("tibetan-aligner")
//!   .args() .cwd() .name()
//!   .run_with_cancellation(token)
//!       --> tokio::process::Command
//!           stdout/stderr lines --> debug log + captured
//!           token cancelled     --> kill
//!       --> ProcessOutput { exit_code, stdout, stderr, interrupted }
//! ```

pub mod builder;
mod runner;
#[cfg(test)]
mod tests;
