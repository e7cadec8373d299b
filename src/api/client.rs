//! Canvas REST endpoints consumed by the exporter.

use tracing::{debug, instrument};
use url::Url;

use super::pagination::{Listing, fetch_paginated};
use crate::download::{DownloadError, RateLimitedExecutor};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://umd.instructure.com/api/v1";

/// Page size requested from every list endpoint.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Authenticated handle on one Canvas instance.
///
/// Owns the API base URL, the bearer token, and the request executor. All
/// endpoint URLs of a run are built here.
#[derive(Debug, Clone)]
pub struct CanvasApi {
    executor: RateLimitedExecutor,
    base_url: Url,
    token: String,
    per_page: u32,
}

impl CanvasApi {
    /// Creates a handle for the API rooted at `base_url` (e.g. `https://host/api/v1`).
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::InvalidUrl`] if `base_url` is not an absolute
    /// URL that can carry path segments.
    pub fn new(
        executor: RateLimitedExecutor,
        base_url: &str,
        token: impl Into<String>,
    ) -> Result<Self, DownloadError> {
        let parsed = Url::parse(base_url).map_err(|_| DownloadError::invalid_url(base_url))?;
        if parsed.cannot_be_a_base() {
            return Err(DownloadError::invalid_url(base_url));
        }
        Ok(Self {
            executor,
            base_url: parsed,
            token: token.into(),
            per_page: DEFAULT_PER_PAGE,
        })
    }

    /// Overrides the page size requested from list endpoints.
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Returns the executor every request goes through.
    #[must_use]
    pub fn executor(&self) -> &RateLimitedExecutor {
        &self.executor
    }

    /// Returns the bearer token presented with every request.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Checks the token with one authenticated GET of the current user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::HttpStatus`] for any non-success response, or
    /// the transport error if no response arrived.
    #[instrument(skip(self))]
    pub async fn validate_token(&self) -> Result<(), DownloadError> {
        let url = self.endpoint(&["users", "self", "profile"]);
        let request = self.executor.client().authorized_get(url.as_str(), &self.token)?;
        let response = self.executor.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url.as_str(), status.as_u16()));
        }
        debug!("token accepted");
        Ok(())
    }

    /// Lists courses with an active enrollment, including their term.
    pub async fn active_courses(&self) -> Listing {
        let url = self.list_endpoint(
            &["courses"],
            &[("enrollment_state", "active"), ("include[]", "term")],
        );
        self.fetch(&url).await
    }

    /// Lists a course's folders.
    pub async fn course_folders(&self, course_id: &str) -> Listing {
        let url = self.list_endpoint(&["courses", course_id, "folders"], &[]);
        self.fetch(&url).await
    }

    /// Lists the files directly inside a folder.
    pub async fn folder_files(&self, folder_id: &str) -> Listing {
        let url = self.list_endpoint(&["folders", folder_id, "files"], &[]);
        self.fetch(&url).await
    }

    /// Lists the direct sub-folders of a folder.
    pub async fn sub_folders(&self, folder_id: &str) -> Listing {
        let url = self.list_endpoint(&["folders", folder_id, "folders"], &[]);
        self.fetch(&url).await
    }

    async fn fetch(&self, url: &Url) -> Listing {
        fetch_paginated(&self.executor, url.as_str(), &self.token).await
    }

    /// Builds `<base>/<segments...>` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Builds a list endpoint URL: `per_page` first, then `query` in order.
    fn list_endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Url {
        let mut url = self.endpoint(segments);
        let per_page = self.per_page.to_string();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("per_page", &per_page);
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}
