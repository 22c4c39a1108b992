// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!            gateway
//!               |
//!               v
//!      ,------------------,
//!      |   GitProtocol    |   async, object safe
//!      '--+----------+----'
//!         |          |
//!         v          v
//!    GixBackend  ShellBackend
//!   (gix, read)  (CLI, write)
//!    .is_repo    .init/.commit
//!    .branch     .clone/.push
//!    .remotes    .checkout_orphan
//! ```
//!
//! **`GixBackend`** reads refs in-process, no subprocess.
//! **`ShellBackend`** drives the git CLI for everything that writes or
//! talks to a remote, so credential handling matches a user's shell.

pub mod backend;

pub use backend::{GitProtocol, GixBackend, ShellBackend};

/// Author identity stamped on commits.
///
/// Passed per command (`git -c user.name=...`) so the user's global git
/// config is never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

impl GitIdentity {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}
