// tm-rs: Translation Memory Publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network module with async downloads.
//!
//! ```text
//! Downloader::new()
//!   .url() .file() .cancellation()
//!        |
//!        v
//!   download() --> stream chunks --> file (removed unless complete)
//!
//! Global client: OnceLock, connection pool, keep-alive
//! Cancellation:  token -> cleanup partial -> TmError::Cancelled
//! Failures:      transport / 5xx -> NetworkError::Transient
//! ```

use std::path::PathBuf;
use std::sync::OnceLock;

use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{NetworkError, TmError, TmResult};

/// RAII guard that removes a partial download file on Drop unless kept.
struct PartialFileGuard {
    path: PathBuf,
    keep: bool,
}

impl PartialFileGuard {
    const fn new(path: PathBuf) -> Self {
        Self { path, keep: false }
    }

    const fn keep(&mut self) {
        self.keep = true;
    }
}

impl Drop for PartialFileGuard {
    fn drop(&mut self) {
        if !self.keep {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Global HTTP client, initialized once and reused across downloads.
fn global_client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent(format!("tm-rs/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Map an unexpected status to an error; 5xx is transient.
pub(crate) fn status_error(status: StatusCode, url: &str) -> NetworkError {
    if status.is_server_error() {
        NetworkError::Transient {
            url: url.to_string(),
            message: format!("server answered {status}"),
        }
    } else {
        NetworkError::HttpError {
            status: status.as_u16(),
            url: url.to_string(),
        }
    }
}

/// Transport failure (connect, timeout, reset) on `url`.
pub(crate) fn transport_error(url: &str, err: &reqwest::Error) -> NetworkError {
    NetworkError::Transient {
        url: url.to_string(),
        message: err.to_string(),
    }
}

/// Async HTTP downloader with builder pattern.
///
/// # Example
/// ```ignore
/// use tm_rs::net::Downloader;
///
/// Downloader::new()
///     .url("https://raw.githubusercontent.com/org/repo/main/text-bo.txt")
///     .file("/tmp/0731-bo.txt")
///     .download()
///     .await?;
/// ```
pub struct Downloader {
    client: Client,
    url: Option<String>,
    output_file: Option<PathBuf>,
    cancellation: CancellationToken,
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Downloader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: global_client().clone(),
            url: None,
            output_file: None,
            cancellation: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Stop the download when `token` is cancelled.
    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    fn target_url(&self) -> TmResult<&str> {
        self.url
            .as_deref()
            .ok_or_else(|| NetworkError::InvalidUrl("no URL provided".to_string()).into())
    }

    async fn send(&self, url: &str) -> TmResult<reqwest::Response> {
        let request = self.client.get(url);
        let response = tokio::select! {
            () = self.cancellation.cancelled() => return Err(TmError::Cancelled),
            response = request.send() => response.map_err(|e| transport_error(url, &e))?,
        };

        if !response.status().is_success() {
            return Err(status_error(response.status(), url).into());
        }
        Ok(response)
    }

    /// Download to the configured file.
    ///
    /// A partial file is removed on any failure.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No URL or output file is configured.
    /// - The request fails or returns a non-success status code.
    /// - The output file cannot be created or written to.
    /// - The download is cancelled (`TmError::Cancelled`).
    pub async fn download(&self) -> TmResult<()> {
        let url = self.target_url()?;
        let output = self
            .output_file
            .as_ref()
            .ok_or_else(|| NetworkError::DownloadFailed {
                url: url.to_string(),
                message: "no output file specified".to_string(),
            })?;
        let failed = |message: String| NetworkError::DownloadFailed {
            url: url.to_string(),
            message,
        };

        let response = self.send(url).await?;

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                failed(format!(
                    "failed to create parent directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let mut file = tokio::fs::File::create(output).await.map_err(|e| {
            failed(format!("failed to create output file {}: {e}", output.display()))
        })?;

        let mut guard = PartialFileGuard::new(output.clone());
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        loop {
            let chunk = tokio::select! {
                () = self.cancellation.cancelled() => return Err(TmError::Cancelled),
                chunk = stream.next() => chunk,
            };
            let Some(chunk) = chunk else { break };
            let chunk = chunk.map_err(|e| transport_error(url, &e))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| failed(format!("failed to write to {}: {e}", output.display())))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| failed(format!("failed to flush {}: {e}", output.display())))?;

        guard.keep();
        debug!(url, path = %output.display(), bytes = written, "downloaded");
        Ok(())
    }
}
