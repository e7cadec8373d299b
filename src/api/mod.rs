//! Canvas REST API access: pagination, entity records, endpoints.
//!
//! # Overview
//!
//! - [`next_link`] - extracts the `next` page URL from a `Link` header
//! - [`fetch_paginated`] - walks every page of a list endpoint into a [`Listing`]
//! - [`Course`], [`Folder`], [`FileDescriptor`] - records built per response
//! - [`CanvasApi`] - base URL + token + executor, one method per endpoint

mod client;
mod link_header;
mod models;
mod pagination;

pub use client::{CanvasApi, DEFAULT_BASE_URL, DEFAULT_PER_PAGE};
pub use link_header::{next_link, parse_link_header};
pub use models::{Course, FileDescriptor, Folder, string_field};
pub use pagination::{Listing, fetch_paginated};

/// One JSON object from a listing page.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;
