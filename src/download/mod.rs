//! HTTP plumbing shared by the listing fetcher and the file downloader.
//!
//! This module provides the pieces every request in a run goes through:
//!
//! - [`HttpClient`] - one configured reqwest client, built once at startup
//! - [`RateLimitedExecutor`] - retries HTTP 429 responses honoring `Retry-After`
//! - [`sanitize_name`] / [`sanitize_path`] - filesystem-safe local names
//!
//! # Example
//!
//! ```no_run
//! use canvas_export_core::download::{HttpClient, RateLimitedExecutor, RetryAfterPolicy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::try_new()?;
//! let executor = RateLimitedExecutor::new(client.clone(), RetryAfterPolicy::default());
//! let request = client.authorized_get("https://canvas.example.edu/api/v1/users/self/profile", "token")?;
//! let response = executor.execute(request).await?;
//! println!("status: {}", response.status());
//! # Ok(())
//! # }
//! ```

mod client;
pub(crate) mod constants;
mod error;
mod filename;
mod rate_limit;

pub use client::{HttpClient, stream_to_file};
pub use error::DownloadError;
pub use filename::{sanitize_name, sanitize_path};
pub use rate_limit::{RateLimitedExecutor, RetryAfterPolicy};

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
