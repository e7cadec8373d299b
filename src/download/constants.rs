//! Constants for the download module (timeouts, 429 handling, buffering).

use std::time::Duration;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large files).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Number of 429 responses tolerated before the final unconditional attempt.
pub const RATE_LIMIT_MAX_ATTEMPTS: u32 = 5;

/// Wait applied when a 429 carries no usable `Retry-After` header.
pub const DEFAULT_RETRY_WAIT: Duration = Duration::from_millis(2000);

/// Upper bound for any single 429 wait, whatever the server asks for.
pub const MAX_RETRY_WAIT: Duration = Duration::from_millis(10_000);

/// Write buffer size used while streaming a file body to disk.
pub const DOWNLOAD_BUFFER_SIZE: usize = 8 * 1024;
