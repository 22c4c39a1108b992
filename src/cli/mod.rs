// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for tm-rs using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! tm [global options] <command>
//! version
//! options
//! configs
//! publish --alignment FILE --text-id ID --bo-url URL --en-url URL
//! align [--work-dir DIR] --text-id ID --bo-url URL --en-url URL
//! exists TEXT_ID
//! next-version TEXT_ID
//! ```

pub mod global;
pub mod tm;


use crate::cli::global::GlobalOptions;
use crate::cli::tm::{AlignArgs, PublishArgs, TextIdArgs};
use clap::{Parser, Subcommand};

/// Translation Memory Publisher
///
/// Publishes sentence alignments as versioned TM repositories.
#[derive(Debug, Parser)]
#[command(
    name = "tm",
    author,
    version,
    about = "Translation Memory Publisher",
    long_about = "tm-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Publishes Tibetan-English sentence alignments as translation\n\
                  memory repositories. The first publish of a text creates\n\
                  `TM{text id}`; every later one adds an orphan branch `vN`.",
    after_help = "CONFIG FILES:\n\n\
                  tm reads `tm.toml` from the current directory when present,\n\
                  then every --config file in order, then TM_* environment\n\
                  variables (TM_GITHUB__ORG=...). Use --no-default-config to\n\
                  skip tm.toml."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their effective values.
    Options,

    /// Lists the configuration files in use.
    Configs,

    /// Publishes an existing alignment file.
    Publish(PublishArgs),

    /// Downloads both texts, aligns them and publishes the result.
    Align(AlignArgs),

    /// Tells whether the TM of a text exists.
    Exists(TextIdArgs),

    /// Shows the version the next update of a TM would get.
    #[command(name = "next-version")]
    NextVersion(TextIdArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
