// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |        publish / align / query
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, layered settings  |
//!              '-------------+-------------'
//!                            v
//!      aligner ----> tm::service (orchestrator)
//!     (command)       |        |        |
//!                     v        v        v
//!                alignment  layout   version
//!                            |
//!                            v
//!                         gateway
//!                       /         \
//!                      v           v
//!                    git         github
//!                 gix/CLI      REST (reqwest)
//!
//!   +-----------------------------------------+
//!   |  core   process runner, `which` cache   |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, net       |
//!   +-----------------------------------------+
//! ```

pub mod aligner;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod gateway;
pub mod git;
pub mod github;
pub mod logging;
pub mod net;
pub mod tm;
