//! HTTP client wrapper shared by every request of a run.
//!
//! This module provides the `HttpClient` struct which owns the configured
//! reqwest client, builds bearer-authenticated requests, and streams response
//! bodies to disk.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{Client, Request, Response};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, DOWNLOAD_BUFFER_SIZE, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use crate::user_agent;

/// HTTP client for API listings and file downloads.
///
/// Created once at startup and passed to every component that talks to the
/// network, taking advantage of connection pooling. Cloning is cheap.
///
/// # Example
///
/// ```no_run
/// use canvas_export_core::download::HttpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::try_new()?;
/// let request = client.authorized_get("https://canvas.example.edu/api/v1/courses", "secret")?;
/// let response = client.send(request).await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes between body reads
    /// - Gzip decompression: enabled
    /// - Redirects: followed (file URLs redirect to storage hosts)
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the TLS backend or system
    /// configuration prevents building the client.
    pub fn try_new() -> Result<Self, DownloadError> {
        Self::try_new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ClientBuild`] if the client cannot be built.
    #[instrument(level = "debug")]
    pub fn try_new_with_timeouts(
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, DownloadError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .read_timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .map_err(|source| DownloadError::ClientBuild { source })?;
        debug!("HTTP client ready");
        Ok(Self { client })
    }

    /// Builds a GET request carrying `Authorization: Bearer <token>`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::InvalidUrl`] if `url` does not parse, or
    /// [`DownloadError::Network`] if reqwest rejects the request parts.
    pub fn authorized_get(&self, url: &str, token: &str) -> Result<Request, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
        self.client
            .get(parsed)
            .bearer_auth(token)
            .build()
            .map_err(|e| DownloadError::network(url, e))
    }

    /// Sends a single request with no retry of any kind.
    ///
    /// Any status is returned as `Ok`; interpreting it is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Timeout`] or [`DownloadError::Network`] when
    /// no response was received.
    pub async fn send(&self, request: Request) -> Result<Response, DownloadError> {
        let url = request.url().to_string();
        self.client.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::timeout(url)
            } else {
                DownloadError::network(url, e)
            }
        })
    }
}

/// Streams a response body into a newly created file, returning bytes written.
///
/// The body is copied chunk by chunk through a fixed-size write buffer, so
/// memory use does not grow with file size. If anything fails after the file
/// was created, the partial file is removed so a later run retries it.
///
/// # Errors
///
/// Returns [`DownloadError::Io`] for local failures and
/// [`DownloadError::Network`] if the body stream breaks.
#[instrument(skip(response), fields(url = %response.url(), path = %path.display()))]
pub async fn stream_to_file(response: Response, path: &Path) -> Result<u64, DownloadError> {
    let url = response.url().to_string();
    let file = File::create(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    let result = copy_body(file, response, &url, path).await;
    if result.is_err() {
        debug!("cleaning up partial file after error");
        let _ = tokio::fs::remove_file(path).await;
    }
    result
}

async fn copy_body(
    file: File,
    response: Response,
    url: &str,
    path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::with_capacity(DOWNLOAD_BUFFER_SIZE, file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    Ok(bytes_written)
}
