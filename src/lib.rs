//! Canvas Export Core Library
//!
//! This library provides the core functionality for the canvas-export tool,
//! which mirrors every file a user can see in their active Canvas courses
//! into a local directory tree.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`download`] - HTTP client, 429-aware request executor, name sanitizing
//! - [`api`] - Link-header pagination, entity records, endpoint construction
//! - [`export`] - Course/folder traversal and idempotent file download
//!
//! Everything runs sequentially on a single task: one request, one write at
//! a time.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod download;
pub mod export;

mod user_agent;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use api::{CanvasApi, Course, FileDescriptor, Folder, JsonObject, Listing, next_link};
pub use download::{
    DownloadError, HttpClient, RateLimitedExecutor, RetryAfterPolicy, sanitize_name,
    sanitize_path,
};
pub use export::{ExportError, ExportStats, Exporter, FileOutcome};
