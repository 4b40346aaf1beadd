//! Scanner - measures a directory tree and prunes small entries

use std::ffi::OsStr;
use std::path::Path;

use tracing::{debug, trace};

use crate::error::{MeasureError, MeasureResult};

use super::config::ScanConfig;
use super::entry::{Attributes, Entry, Measurement, SkippedEntry};
use super::source::{DirListing, DirSource, FsSource, ListingError};

/// Measure `path` on the real filesystem.
///
/// `is_top_level` marks the scan root, whose own attributes have to be
/// looked up since no parent listing describes it.
pub fn measure(path: &Path, threshold: u64, is_top_level: bool) -> MeasureResult<Measurement> {
    Scanner::new(ScanConfig::with_threshold(threshold)).measure(path, is_top_level)
}

/// Builds a size-annotated tree of a directory.
///
/// Each directory's `size` is the total of everything enumerated under it.
/// Its `children` only keep entries whose own size reaches the threshold.
/// Directories that cannot be listed are reported as [`SkippedEntry`]s and
/// left out of both; the scan carries on with their siblings.
pub struct Scanner<S = FsSource> {
    config: ScanConfig,
    source: S,
}

impl Scanner<FsSource> {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            source: FsSource,
        }
    }
}

impl<S: DirSource> Scanner<S> {
    pub fn with_source<T: DirSource>(self, source: T) -> Scanner<T> {
        Scanner {
            config: self.config,
            source,
        }
    }

    pub fn measure(&self, path: &Path, is_top_level: bool) -> MeasureResult<Measurement> {
        self.measure_dir(path, path.as_os_str(), Attributes::DIRECTORY, is_top_level)
    }

    fn measure_dir(
        &self,
        path: &Path,
        name: &OsStr,
        attributes: Attributes,
        is_top_level: bool,
    ) -> MeasureResult<Measurement> {
        trace!(path = %path.display(), "measuring directory");

        let mut listing = match self.source.open(path) {
            Ok(listing) => listing,
            Err(err) => return Ok(skip(path, err)),
        };

        let attributes = if is_top_level {
            match self.source.attributes(path) {
                Ok(attributes) => attributes,
                Err(err) => {
                    close(listing, path)?;
                    return Ok(skip(path, err));
                }
            }
        } else {
            attributes
        };

        let mut children = Vec::new();
        let mut skipped = Vec::new();
        let mut total_size: u64 = 0;

        for record in listing.by_ref() {
            let raw = match record {
                Ok(raw) => raw,
                Err(ListingError { name, source }) => {
                    let failed = name.map_or_else(|| path.to_path_buf(), |n| path.join(n));
                    debug!(path = %failed.display(), error = %source, "skipping unreadable entry");
                    skipped.push(SkippedEntry::new(failed, source));
                    continue;
                }
            };
            if is_dot_path(&raw.name) {
                continue;
            }

            let child = if raw.is_dir() {
                let child_path = path.join(&raw.name);
                let sub = self.measure_dir(&child_path, &raw.name, raw.attributes, false)?;
                skipped.extend(sub.skipped);
                match sub.root {
                    Some(entry) => entry,
                    None => continue,
                }
            } else {
                Entry::file(raw.name, raw.size, raw.attributes)
            };

            total_size = total_size.saturating_add(child.size);
            children.push(child);
        }

        close(listing, path)?;

        let mut entry = Entry {
            name: name.to_os_string(),
            size: total_size,
            attributes: attributes | Attributes::DIRECTORY,
            children,
        };
        entry.prune(self.config.threshold);

        Ok(Measurement {
            root: Some(entry),
            skipped,
        })
    }
}

fn skip(path: &Path, err: std::io::Error) -> Measurement {
    debug!(path = %path.display(), error = %err, "skipping unreadable directory");
    Measurement {
        root: None,
        skipped: vec![SkippedEntry::new(path, err)],
    }
}

fn close<L: DirListing>(listing: L, path: &Path) -> MeasureResult<()> {
    listing.close().map_err(|source| MeasureError::HandleClose {
        path: path.to_path_buf(),
        source,
    })
}

fn is_dot_path(name: &OsStr) -> bool {
    name == "." || name == ".."
}
