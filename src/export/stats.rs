//! Run-wide counters reported when an export finishes.

use super::files::FileOutcome;
use crate::api::Listing;

/// Counts of what a run did.
///
/// The exporter runs on a single task, so plain integers suffice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportStats {
    courses: usize,
    folders: usize,
    downloaded: usize,
    skipped: usize,
    failed: usize,
    listings_failed: usize,
    listings_partial: usize,
    bytes: u64,
}

impl ExportStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of courses whose directory was set up.
    #[must_use]
    pub fn courses(&self) -> usize {
        self.courses
    }

    /// Returns the number of folders popped from the traversal stack.
    #[must_use]
    pub fn folders(&self) -> usize {
        self.folders
    }

    /// Returns the number of files written this run.
    #[must_use]
    pub fn downloaded(&self) -> usize {
        self.downloaded
    }

    /// Returns the number of files left alone because they already existed.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Returns the number of files that could not be downloaded.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Returns the number of listings that yielded nothing because their first page failed.
    #[must_use]
    pub fn listings_failed(&self) -> usize {
        self.listings_failed
    }

    /// Returns the number of listings cut short after at least one page.
    #[must_use]
    pub fn listings_partial(&self) -> usize {
        self.listings_partial
    }

    /// Returns the number of bytes written to disk.
    #[must_use]
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub(crate) fn record_course(&mut self) {
        self.courses += 1;
    }

    pub(crate) fn record_folder(&mut self) {
        self.folders += 1;
    }

    pub(crate) fn record_listing(&mut self, listing: &Listing) {
        match listing {
            Listing::Complete(_) => {}
            Listing::Partial { .. } => self.listings_partial += 1,
            Listing::Failed(_) => self.listings_failed += 1,
        }
    }

    pub(crate) fn record_file(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Downloaded { bytes, .. } => {
                self.downloaded += 1;
                self.bytes += bytes;
            }
            FileOutcome::Skipped { .. } => self.skipped += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
        }
    }
}
