//! Course → folder tree → file export.
//!
//! This module provides the [`Exporter`], which mirrors each active course's
//! folder tree under a root directory and downloads every file exactly once.
//!
//! # Overview
//!
//! For each course the exporter creates the course directory, pushes the
//! course's folders onto an explicit stack, and pops until the stack is empty.
//! Each popped folder gets its directory, then its files, then its sub-folders
//! pushed. The tree is walked iteratively because its depth is whatever the
//! API reports.
//!
//! Failures stay local: a failed listing contributes no children, a failed
//! download skips one file, and a course that cannot be set up is skipped.
//! Only an empty or failed course listing aborts the run.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use canvas_export_core::{CanvasApi, Exporter, HttpClient, RateLimitedExecutor, RetryAfterPolicy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::try_new()?;
//! let executor = RateLimitedExecutor::new(client, RetryAfterPolicy::default());
//! let api = CanvasApi::new(executor, "https://canvas.example.edu/api/v1", "token")?;
//! let stats = Exporter::new(&api, Path::new("./canvas")).run().await?;
//! println!("downloaded {} files", stats.downloaded());
//! # Ok(())
//! # }
//! ```

mod files;
mod stats;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::api::{CanvasApi, Course, FileDescriptor, Folder, Listing};
use crate::download::DownloadError;

pub use files::{FileOutcome, download_file};
pub use stats::ExportStats;

/// Errors that abort an export run.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The course listing failed or was empty.
    #[error("no courses returned")]
    NoCourses {
        /// Why the listing failed, if it did not simply come back empty.
        #[source]
        source: Option<DownloadError>,
    },
}

/// Walks courses and writes their files under one root directory.
#[derive(Debug)]
pub struct Exporter<'a> {
    api: &'a CanvasApi,
    root: PathBuf,
}

impl<'a> Exporter<'a> {
    /// Creates an exporter writing under `root`.
    #[must_use]
    pub fn new(api: &'a CanvasApi, root: &Path) -> Self {
        Self {
            api,
            root: root.to_path_buf(),
        }
    }

    /// Lists active courses and exports each of them.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::NoCourses`] when the course listing fails before
    /// yielding anything, or yields no course. Every later failure is logged
    /// and counted in the returned stats instead.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn run(&self) -> Result<ExportStats, ExportError> {
        let listing = self.api.active_courses().await;
        if let Listing::Partial { error, .. } = &listing {
            warn!(error = %error, "course listing incomplete, exporting what was returned");
        }

        let (objects, source) = match listing {
            Listing::Failed(error) => (Vec::new(), Some(error)),
            other => (other.into_items(), None),
        };

        let courses: Vec<Course> = objects
            .iter()
            .filter_map(|object| {
                let course = Course::from_json(object);
                if course.is_none() {
                    warn!("course without id, skipping");
                }
                course
            })
            .collect();

        if courses.is_empty() {
            return Err(ExportError::NoCourses { source });
        }

        info!(courses = courses.len(), "active courses listed");
        Ok(self.export_courses(&courses).await)
    }

    /// Exports each course in turn. One course's failure never stops the next.
    pub async fn export_courses(&self, courses: &[Course]) -> ExportStats {
        let mut stats = ExportStats::new();
        for course in courses {
            self.export_course(course, &mut stats).await;
        }
        info!(
            courses = stats.courses(),
            folders = stats.folders(),
            downloaded = stats.downloaded(),
            skipped = stats.skipped(),
            failed = stats.failed(),
            listings_failed = stats.listings_failed(),
            listings_partial = stats.listings_partial(),
            bytes = stats.bytes(),
            "export finished"
        );
        stats
    }

    /// Exports one course: its directory, then its folder tree.
    #[instrument(skip(self, course, stats), fields(course_id = %course.id))]
    pub async fn export_course(&self, course: &Course, stats: &mut ExportStats) {
        let course_dir = self.root.join(course.dir_name());
        if let Err(e) = tokio::fs::create_dir_all(&course_dir).await {
            warn!(
                dir = %course_dir.display(),
                error = %DownloadError::io(&course_dir, e),
                "cannot create course directory, skipping course"
            );
            return;
        }
        stats.record_course();
        info!(
            dir = %course_dir.display(),
            term = course.term_name().unwrap_or("-"),
            "exporting course"
        );

        let listing = self.api.course_folders(&course.id).await;
        stats.record_listing(&listing);
        let mut stack: Vec<Folder> = folders_from(listing);

        while let Some(folder) = stack.pop() {
            stats.record_folder();
            let folder_dir = course_dir.join(folder.relative_path());

            match tokio::fs::create_dir_all(&folder_dir).await {
                Ok(()) => self.export_files(&folder, &folder_dir, stats).await,
                Err(e) => warn!(
                    folder_id = %folder.id,
                    error = %DownloadError::io(&folder_dir, e),
                    "cannot create folder directory, skipping its files"
                ),
            }

            let listing = self.api.sub_folders(&folder.id).await;
            stats.record_listing(&listing);
            stack.extend(folders_from(listing));
        }
    }

    async fn export_files(&self, folder: &Folder, folder_dir: &Path, stats: &mut ExportStats) {
        let listing = self.api.folder_files(&folder.id).await;
        stats.record_listing(&listing);

        for object in listing.into_items() {
            let Some(file) = FileDescriptor::from_json(&object) else {
                warn!(folder_id = %folder.id, "file without url or name, skipping");
                continue;
            };
            let outcome = download_file(self.api, &file, folder_dir).await;
            stats.record_file(&outcome);
        }
    }
}

fn folders_from(listing: Listing) -> Vec<Folder> {
    listing
        .into_items()
        .iter()
        .filter_map(|object| {
            let folder = Folder::from_json(object);
            if folder.is_none() {
                debug!("folder without id, skipping");
            }
            folder
        })
        .collect()
}
