// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                 TmError (~24 bytes)
//!                        |
//!   +-------+------+-----+-----+------+-------+-----+
//!   |       |      |     |     |      |       |     |
//!   v       v      v     v     v      v       v     v
//! Align   Repo    Git   Net   Cfg   Proc     Fs   Io/Cancelled/Other
//!  Box    Box     Box   Box   Box    Box     Box
//!
//! Sub-errors (unboxed internally):
//!   Alignment MalformedLine
//!   Repo      Creation, Clone, VersionCommit, Conflict
//!   Git       Gix, CommandFailed, InvalidPath
//!   Network   Transient, HttpError, Reqwest, DownloadFailed
//!   Config    ParseError, MissingKey, InvalidValue
//!   Process   ExecutableNotFound, NonZeroExit, MissingOutput
//!   Fs        IoError
//! ```
//!
//! Retryable failures are `NetworkError::Transient` and `RepoError::Conflict`;
//! everything else is fatal for the invocation.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`TmError`].
pub type TmResult<T> = std::result::Result<T, TmError>;

/// Top-level error type of the TM publisher.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum TmError {
    /// Alignment file could not be parsed.
    #[error("alignment error: {0}")]
    Alignment(#[from] Box<AlignmentError>),

    /// Remote repository workflow failed.
    #[error("repository error: {0}")]
    Repo(#[from] Box<RepoError>),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Network operation failed.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// External process error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// The invocation was cancelled before it finished.
    #[error("operation cancelled")]
    Cancelled,

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

impl TmError {
    /// Whether re-running the whole invocation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(err) => matches!(**err, NetworkError::Transient { .. }),
            Self::Repo(err) => matches!(**err, RepoError::Conflict { .. }),
            _ => false,
        }
    }
}

/// Create a generic [`TmError::Other`].
pub fn other(message: impl Into<String>) -> TmError {
    TmError::Other(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for TmError {
                fn from(err: $error) -> Self {
                    TmError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    AlignmentError => Alignment,
    RepoError => Repo,
    GitError => Git,
    NetworkError => Network,
    ConfigError => Config,
    ProcessError => Process,
    FsError => Fs,
    std::io::Error => Io,
}

// --- Alignment Errors ---

/// Alignment parsing errors.
#[derive(Debug, Error)]
pub enum AlignmentError {
    /// A line could not be split into a segment pair.
    #[error("malformed line {line_number} in {file}: {content:?}")]
    MalformedLine {
        file: String,
        line_number: usize,
        content: String,
    },
}

// --- Repository Errors ---

/// Remote repository workflow errors, one per gateway operation.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Creating the remote repository or pushing its initial content failed.
    #[error("failed to create repository {repo}: {message}")]
    Creation { repo: String, message: String },

    /// Cloning an existing repository failed.
    #[error("failed to clone repository {repo}: {message}")]
    Clone { repo: String, message: String },

    /// Committing or pushing a version branch failed.
    #[error("failed to commit version {version} to {repo}: {message}")]
    VersionCommit {
        repo: String,
        version: String,
        message: String,
    },

    /// Another writer published the same version first.
    #[error("version {version} of {repo} was published concurrently: {message}")]
    Conflict {
        repo: String,
        version: String,
        message: String,
    },

    /// The highest existing version has no representable successor.
    #[error("no version label follows {latest}")]
    VersionsExhausted { latest: String },
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
///
/// Large error types are boxed to keep enum size manageable.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to open repository.
    #[error("failed to open repository: {0}")]
    Open(#[from] Box<gix::open::Error>),

    /// Failed to iterate references.
    #[error("failed to read references: {0}")]
    References(String),
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),

    /// Path cannot be passed to git.
    #[error("invalid path for git: {0}")]
    InvalidPath(String),
}

impl GitError {
    /// Whether the remote refused the push (branch already exists or moved).
    #[must_use]
    pub fn is_push_rejection(&self) -> bool {
        match self {
            Self::CommandFailed { message, .. } => {
                message.contains("[rejected]")
                    || message.contains("non-fast-forward")
                    || message.contains("fetch first")
                    || message.contains("already exists")
            }
            _ => false,
        }
    }
}

// --- Network Errors ---

/// Network operation errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The host could not be reached or answered with a server error.
    #[error("host unreachable at {url}: {message}")]
    Transient { url: String, message: String },

    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// Download failed.
    #[error("download failed: {url} - {message}")]
    DownloadFailed { url: String, message: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration.
    #[error("failed to parse config '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Process Errors ---

/// External process errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}: {stderr}")]
    NonZeroExit {
        command: String,
        code: i32,
        stderr: String,
    },

    /// Process finished without reporting where its result is.
    #[error("process '{command}' printed no output marker")]
    MissingOutput { command: String },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.display().to_string(),
            source,
        }
    }
}
