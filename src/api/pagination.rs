//! Paginated listing fetcher.
//!
//! Walks a list endpoint page by page, following the `next` relation of each
//! response's `Link` header, and flattens every page into one ordered sequence.
//! A failing page never aborts the run: it only truncates the listing, and the
//! [`Listing`] variant tells the caller whether that happened.

use std::collections::HashSet;

use reqwest::header::LINK;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::JsonObject;
use super::link_header::next_link;
use crate::download::{DownloadError, RateLimitedExecutor};

/// Outcome of fetching every page of a list endpoint.
#[derive(Debug)]
pub enum Listing {
    /// Every page was fetched; the items may legitimately be empty.
    Complete(Vec<JsonObject>),

    /// Some pages were fetched before a later page failed.
    Partial {
        /// Items from the pages fetched before the failure, in page order.
        items: Vec<JsonObject>,
        /// Why the next page could not be used.
        error: DownloadError,
    },

    /// The very first page failed; nothing was collected.
    Failed(DownloadError),
}

impl Listing {
    /// Builds the right variant for a walk that stopped on `error`.
    #[must_use]
    pub fn truncated(items: Vec<JsonObject>, error: DownloadError) -> Self {
        if items.is_empty() {
            Self::Failed(error)
        } else {
            Self::Partial { items, error }
        }
    }

    /// Returns the collected items, empty when the fetch failed outright.
    #[must_use]
    pub fn into_items(self) -> Vec<JsonObject> {
        match self {
            Self::Complete(items) | Self::Partial { items, .. } => items,
            Self::Failed(_) => Vec::new(),
        }
    }

    /// Returns the collected items.
    #[must_use]
    pub fn items(&self) -> &[JsonObject] {
        match self {
            Self::Complete(items) | Self::Partial { items, .. } => items,
            Self::Failed(_) => &[],
        }
    }

    /// Returns the error that cut the listing short, if any.
    #[must_use]
    pub fn error(&self) -> Option<&DownloadError> {
        match self {
            Self::Complete(_) => None,
            Self::Partial { error, .. } | Self::Failed(error) => Some(error),
        }
    }

    /// Returns true when every page was fetched.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    /// Returns true when not even the first page could be used.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// One parsed page: its objects and the URL of the page after it.
#[derive(Debug)]
struct Page {
    items: Vec<JsonObject>,
    next: Option<String>,
}

/// Fetches `start_url` and every page linked after it.
///
/// Each request is a bearer-authenticated GET sent through `executor`, so 429
/// responses are waited out before a page counts as failed. Items keep page
/// order, then within-page order. A non-success status, a transport error, an
/// unparsable body, or a body that is not a JSON array of objects stops the
/// walk; what was collected so far is returned as [`Listing::Partial`], or
/// [`Listing::Failed`] if nothing was. A `next` link pointing at a page that
/// was already fetched also stops the walk, keeping the listing complete.
#[instrument(skip(executor, token), fields(start_url = %start_url))]
pub async fn fetch_paginated(
    executor: &RateLimitedExecutor,
    start_url: &str,
    token: &str,
) -> Listing {
    let mut items = Vec::new();
    let mut visited = HashSet::new();
    let mut next = Some(start_url.to_string());

    while let Some(url) = next.take() {
        if !visited.insert(url.clone()) {
            warn!(url = %url, "next link revisits a fetched page, stopping pagination");
            break;
        }

        match fetch_page(executor, &url, token).await {
            Ok(page) => {
                debug!(url = %url, count = page.items.len(), has_next = page.next.is_some(), "page fetched");
                items.extend(page.items);
                next = page.next;
            }
            Err(error) => {
                warn!(url = %url, error = %error, collected = items.len(), "listing truncated");
                return Listing::truncated(items, error);
            }
        }
    }

    Listing::Complete(items)
}

async fn fetch_page(
    executor: &RateLimitedExecutor,
    url: &str,
    token: &str,
) -> Result<Page, DownloadError> {
    let request = executor.client().authorized_get(url, token)?;
    let response = executor.execute(request).await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::http_status(url, status.as_u16()));
    }

    let next = next_link(response.headers().get(LINK).and_then(|v| v.to_str().ok()));
    let body = response
        .bytes()
        .await
        .map_err(|e| DownloadError::network(url, e))?;

    Ok(Page {
        items: parse_page(url, &body)?,
        next,
    })
}

/// Parses a page body as a JSON array of objects.
fn parse_page(url: &str, body: &[u8]) -> Result<Vec<JsonObject>, DownloadError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| DownloadError::invalid_payload(url, format!("invalid JSON: {e}")))?;

    let Value::Array(elements) = value else {
        return Err(DownloadError::invalid_payload(url, "expected a JSON array"));
    };

    elements
        .into_iter()
        .map(|element| match element {
            Value::Object(object) => Ok(object),
            other => Err(DownloadError::invalid_payload(
                url,
                format!("expected an array of objects, found element {other}"),
            )),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const URL: &str = "https://canvas.example.edu/api/v1/courses";

    #[test]
    fn test_parse_page_accepts_array_of_objects() {
        let items = parse_page(URL, br#"[{"id": 1}, {"id": 2}]"#).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["id"], 2);
    }

    #[test]
    fn test_parse_page_accepts_empty_array() {
        assert!(parse_page(URL, b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_page_rejects_non_array() {
        let err = parse_page(URL, br#"{"errors": [{"message": "unauthorized"}]}"#).unwrap_err();
        assert!(matches!(err, DownloadError::InvalidPayload { .. }));
        assert!(err.to_string().contains("JSON array"));
    }

    #[test]
    fn test_parse_page_rejects_invalid_json() {
        let err = parse_page(URL, b"<html>login</html>").unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_parse_page_rejects_scalar_elements() {
        let err = parse_page(URL, b"[1, 2]").unwrap_err();
        assert!(matches!(err, DownloadError::InvalidPayload { .. }));
    }

    #[test]
    fn test_listing_truncated_picks_variant() {
        let failed = Listing::truncated(Vec::new(), DownloadError::http_status(URL, 500));
        assert!(failed.is_failed());
        assert!(failed.items().is_empty());

        let mut object = JsonObject::new();
        object.insert("id".to_string(), Value::from(1));
        let partial = Listing::truncated(vec![object], DownloadError::http_status(URL, 500));
        assert!(!partial.is_failed());
        assert!(!partial.is_complete());
        assert_eq!(partial.error().and_then(DownloadError::status), Some(500));
        assert_eq!(partial.into_items().len(), 1);
    }

    #[test]
    fn test_listing_complete_has_no_error() {
        let listing = Listing::Complete(Vec::new());
        assert!(listing.is_complete());
        assert!(listing.error().is_none());
        assert!(listing.into_items().is_empty());
    }
}
