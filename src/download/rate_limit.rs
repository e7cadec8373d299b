//! HTTP 429 handling for every API and file request.
//!
//! This module provides [`RetryAfterPolicy`], which turns a `Retry-After`
//! header into a bounded wait, and [`RateLimitedExecutor`], which replays a
//! request while the server keeps answering `429 Too Many Requests`.
//!
//! # Overview
//!
//! Only 429 is retried. Any other status, success or not, goes straight back
//! to the caller, and so do network errors. After the policy's attempt budget
//! is spent one last request is sent and its response is returned whatever
//! its status, so the worst case per request is bounded by
//! `max_attempts * max_wait` plus network time.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use canvas_export_core::download::{HttpClient, RateLimitedExecutor, RetryAfterPolicy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::try_new()?;
//! let policy = RetryAfterPolicy::new(5, Duration::from_secs(2), Duration::from_secs(10));
//! let executor = RateLimitedExecutor::new(client.clone(), policy);
//! let request = client.authorized_get("https://canvas.example.edu/api/v1/courses", "token")?;
//! let response = executor.execute(request).await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{Request, Response, StatusCode};
use tracing::{debug, instrument, warn};

use super::constants::{DEFAULT_RETRY_WAIT, MAX_RETRY_WAIT, RATE_LIMIT_MAX_ATTEMPTS};
use super::{DownloadError, HttpClient};

/// How long to wait between 429 responses, and how many to tolerate.
///
/// # Default Values
///
/// - `max_attempts`: 5
/// - `default_wait`: 2 seconds (no or unparsable `Retry-After`)
/// - `max_wait`: 10 seconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryAfterPolicy {
    /// Number of 429 responses answered with a wait before the final attempt.
    max_attempts: u32,

    /// Wait used when the header is missing or not an integer.
    default_wait: Duration,

    /// Cap applied to every wait.
    max_wait: Duration,
}

impl Default for RetryAfterPolicy {
    fn default() -> Self {
        Self {
            max_attempts: RATE_LIMIT_MAX_ATTEMPTS,
            default_wait: DEFAULT_RETRY_WAIT,
            max_wait: MAX_RETRY_WAIT,
        }
    }
}

impl RetryAfterPolicy {
    /// Creates a policy with custom settings.
    ///
    /// `max_attempts` is raised to at least 1.
    #[must_use]
    pub fn new(max_attempts: u32, default_wait: Duration, max_wait: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            default_wait,
            max_wait,
        }
    }

    /// Returns the number of 429 responses tolerated before the final attempt.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the cap applied to every wait.
    #[must_use]
    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// Computes the wait for one 429 response from its `Retry-After` value.
    ///
    /// The header is read as whole seconds. Absent, negative, or otherwise
    /// unparsable values fall back to the default wait. The result never
    /// exceeds the cap.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use canvas_export_core::download::RetryAfterPolicy;
    ///
    /// let policy = RetryAfterPolicy::default();
    /// assert_eq!(policy.wait_for(Some("3")), Duration::from_secs(3));
    /// assert_eq!(policy.wait_for(Some("120")), Duration::from_secs(10));
    /// assert_eq!(policy.wait_for(None), Duration::from_secs(2));
    /// ```
    #[must_use]
    pub fn wait_for(&self, retry_after: Option<&str>) -> Duration {
        let requested = retry_after
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map_or(self.default_wait, Duration::from_secs);
        requested.min(self.max_wait)
    }
}

/// Sends requests, transparently waiting out HTTP 429 responses.
///
/// Holds no per-request state, so one executor serves the whole run.
#[derive(Debug, Clone)]
pub struct RateLimitedExecutor {
    client: HttpClient,
    policy: RetryAfterPolicy,
}

impl RateLimitedExecutor {
    /// Creates an executor over a shared client.
    #[must_use]
    pub fn new(client: HttpClient, policy: RetryAfterPolicy) -> Self {
        Self { client, policy }
    }

    /// Returns the client requests are sent through.
    #[must_use]
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Sends `request`, retrying while the server answers 429.
    ///
    /// A 429 response is discarded, the wait from [`RetryAfterPolicy::wait_for`]
    /// is slept, and the request is sent again. Once `max_attempts` 429s have
    /// been seen, one final attempt is made and returned as-is, even if it is
    /// another 429. Requests whose body cannot be replayed are sent once.
    ///
    /// # Errors
    ///
    /// Returns the network or timeout error of whichever attempt failed to
    /// get a response; those are not retried.
    #[instrument(skip(self, request), fields(url = %request.url()))]
    pub async fn execute(&self, request: Request) -> Result<Response, DownloadError> {
        let mut attempts: u32 = 0;

        loop {
            let Some(attempt_request) = request.try_clone() else {
                debug!("request body cannot be replayed, sending once");
                return self.client.send(request).await;
            };

            attempts += 1;
            let response = self.client.send(attempt_request).await?;
            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }

            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            drop(response);

            let wait = self.policy.wait_for(retry_after.as_deref());
            warn!(
                attempt = attempts,
                max_attempts = self.policy.max_attempts,
                retry_after = retry_after.as_deref().unwrap_or("-"),
                wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                "rate limited, waiting before retry"
            );
            tokio::time::sleep(wait).await;

            if attempts >= self.policy.max_attempts {
                debug!(attempts, "429 budget exhausted, sending final attempt");
                return self.client.send(request).await;
            }
        }
    }
}
