//! Test utilities for building directory fixtures.
//!
//! This module is only compiled for tests and benchmarks.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::vec;

use tempfile::TempDir;

use crate::tree::{Attributes, DirListing, DirSource, ListingError, RawEntry};

/// A temporary directory tree for testing.
///
/// Files are filled with zero bytes so their sizes are exact.
/// The directory is automatically cleaned up when dropped.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file of `size` bytes, creating parent directories as needed.
    pub fn add_file(&self, path: &str, size: usize) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, vec![0u8; size]).expect("Failed to write file");
        full_path
    }

    /// Add an empty directory.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

type Record = Result<RawEntry, (Option<OsString>, i32)>;

#[derive(Debug, Default)]
struct HandleCounts {
    opened: Cell<usize>,
    closed: Cell<usize>,
    released: Cell<usize>,
}

/// In-memory directory tree with injectable failures.
///
/// Directories are keyed by the path the scanner will ask for, so a
/// child `sub` of `root` is registered as `root/sub`. Every listing handed
/// out is counted, which lets tests check that each one was released.
#[derive(Debug, Default)]
pub struct MemorySource {
    dirs: HashMap<PathBuf, Result<Vec<Record>, i32>>,
    lookups: HashMap<PathBuf, Result<Attributes, i32>>,
    failing_close: HashSet<PathBuf>,
    counts: Rc<HandleCounts>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a readable directory with the given records.
    pub fn dir(mut self, path: impl Into<PathBuf>, entries: Vec<RawEntry>) -> Self {
        let records = entries.into_iter().map(Ok).collect();
        self.dirs.insert(path.into(), Ok(records));
        self
    }

    /// Register a directory whose listing fails to open with `code`.
    pub fn unreadable(mut self, path: impl Into<PathBuf>, code: i32) -> Self {
        self.dirs.insert(path.into(), Err(code));
        self
    }

    /// Make the attribute lookup of `path` fail with `code`.
    pub fn unresolvable(mut self, path: impl Into<PathBuf>, code: i32) -> Self {
        self.lookups.insert(path.into(), Err(code));
        self
    }

    /// Override the attributes returned by looking up `path`.
    pub fn root_attributes(mut self, path: impl Into<PathBuf>, attributes: Attributes) -> Self {
        self.lookups.insert(path.into(), Ok(attributes));
        self
    }

    /// Append a record to `path`'s listing that fails to read.
    pub fn broken_record(mut self, path: impl Into<PathBuf>, name: Option<&str>, code: i32) -> Self {
        let records = self.dirs.entry(path.into()).or_insert_with(|| Ok(Vec::new()));
        if let Ok(records) = records {
            records.push(Err((name.map(OsString::from), code)));
        }
        self
    }

    /// Make closing `path`'s listing fail.
    pub fn failing_close(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing_close.insert(path.into());
        self
    }

    /// Number of listings opened so far.
    pub fn opened(&self) -> usize {
        self.counts.opened.get()
    }

    /// Number of listings explicitly closed so far.
    pub fn closed(&self) -> usize {
        self.counts.closed.get()
    }

    /// Number of listings released, whether closed or dropped.
    pub fn released(&self) -> usize {
        self.counts.released.get()
    }
}

pub struct MemoryListing {
    records: vec::IntoIter<Record>,
    fail_close: bool,
    counts: Rc<HandleCounts>,
}

impl Iterator for MemoryListing {
    type Item = Result<RawEntry, ListingError>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.records.next()?.map_err(|(name, code)| ListingError {
            name,
            source: io::Error::from_raw_os_error(code),
        }))
    }
}

impl DirListing for MemoryListing {
    fn close(self) -> io::Result<()> {
        self.counts.closed.set(self.counts.closed.get() + 1);
        if self.fail_close {
            Err(io::Error::other("handle close failed"))
        } else {
            Ok(())
        }
    }
}

impl Drop for MemoryListing {
    fn drop(&mut self) {
        self.counts.released.set(self.counts.released.get() + 1);
    }
}

impl DirSource for MemorySource {
    type Listing = MemoryListing;

    fn open(&self, path: &Path) -> io::Result<MemoryListing> {
        match self.dirs.get(path) {
            Some(Ok(records)) => {
                self.counts.opened.set(self.counts.opened.get() + 1);
                Ok(MemoryListing {
                    records: records.clone().into_iter(),
                    fail_close: self.failing_close.contains(path),
                    counts: Rc::clone(&self.counts),
                })
            }
            Some(Err(code)) => Err(io::Error::from_raw_os_error(*code)),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn attributes(&self, path: &Path) -> io::Result<Attributes> {
        match self.lookups.get(path) {
            Some(Ok(attributes)) => Ok(*attributes),
            Some(Err(code)) => Err(io::Error::from_raw_os_error(*code)),
            None if self.dirs.contains_key(path) => Ok(Attributes::DIRECTORY),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }
}
