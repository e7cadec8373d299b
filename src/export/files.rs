//! Idempotent download of a single file into its folder's directory.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::api::{CanvasApi, FileDescriptor};
use crate::download::{DownloadError, stream_to_file};

/// What happened to one file of a folder listing.
#[derive(Debug)]
pub enum FileOutcome {
    /// The body was streamed to `path`.
    Downloaded {
        /// Local file written.
        path: PathBuf,
        /// Bytes written.
        bytes: u64,
    },

    /// Something already existed at `path`; nothing was requested.
    Skipped {
        /// Local path that already existed.
        path: PathBuf,
    },

    /// The file could not be fetched or written; nothing is left at `path`.
    Failed {
        /// Local path that was targeted.
        path: PathBuf,
        /// Why the file was not saved.
        error: DownloadError,
    },
}

impl FileOutcome {
    /// Returns the local path this outcome concerns.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Downloaded { path, .. } | Self::Skipped { path } | Self::Failed { path, .. } => {
                path
            }
        }
    }
}

/// Downloads `file` into `dir` unless a file of the same name is already there.
///
/// Existence alone decides: an existing file is never compared with the
/// remote one. Otherwise an authenticated GET of the file's direct URL goes
/// through the 429-aware executor and a success response is streamed to disk.
/// Every failure is logged and reported as [`FileOutcome::Failed`]; none is
/// propagated.
#[instrument(skip(api, file, dir), fields(name = %file.display_name))]
pub async fn download_file(api: &CanvasApi, file: &FileDescriptor, dir: &Path) -> FileOutcome {
    let path = dir.join(file.file_name());

    match tokio::fs::try_exists(&path).await {
        Ok(true) => {
            debug!(path = %path.display(), "already present, skipping");
            return FileOutcome::Skipped { path };
        }
        Ok(false) => {}
        Err(e) => {
            let error = DownloadError::io(&path, e);
            warn!(error = %error, "cannot check target, skipping file");
            return FileOutcome::Failed { path, error };
        }
    }

    match fetch_to_path(api, &file.url, &path).await {
        Ok(bytes) => {
            info!(path = %path.display(), bytes, "file downloaded");
            FileOutcome::Downloaded { path, bytes }
        }
        Err(error) => {
            warn!(url = %file.url, path = %path.display(), error = %error, "file download failed");
            FileOutcome::Failed { path, error }
        }
    }
}

async fn fetch_to_path(api: &CanvasApi, url: &str, path: &Path) -> Result<u64, DownloadError> {
    let request = api.executor().client().authorized_get(url, api.token())?;
    let response = api.executor().execute(request).await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::http_status(url, status.as_u16()));
    }

    stream_to_file(response, path).await
}
