//! Directory enumeration
//!
//! The scanner only ever asks two things of the filesystem: list the
//! immediate children of a directory, and look up the attributes of the
//! scan root. Both sit behind [`DirSource`] so scans can run against
//! something other than the real disk.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::Path;

use super::entry::Attributes;

/// One record produced by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub name: OsString,
    /// Size reported by the filesystem. Ignored for directories.
    pub size: u64,
    pub attributes: Attributes,
}

impl RawEntry {
    pub fn file(name: impl Into<OsString>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            attributes: Attributes::empty(),
        }
    }

    pub fn dir(name: impl Into<OsString>) -> Self {
        Self {
            name: name.into(),
            size: 0,
            attributes: Attributes::DIRECTORY,
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes |= attributes;
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn is_dir(&self) -> bool {
        self.attributes.is_dir()
    }
}

/// A record inside an open listing that could not be read.
#[derive(Debug)]
pub struct ListingError {
    /// Name of the offending child, if the listing got that far.
    pub name: Option<OsString>,
    pub source: io::Error,
}

/// An open directory listing.
///
/// Dropping a listing releases it; [`close`](DirListing::close) does the
/// same but reports failure, which the scanner treats as unrecoverable.
pub trait DirListing: Iterator<Item = Result<RawEntry, ListingError>> {
    fn close(self) -> io::Result<()>;
}

/// Source of directory listings and root attributes.
pub trait DirSource {
    type Listing: DirListing;

    /// Open a listing of the immediate children of `path`.
    fn open(&self, path: &Path) -> io::Result<Self::Listing>;

    /// Look up the attributes of `path` itself.
    fn attributes(&self, path: &Path) -> io::Result<Attributes>;
}

/// The real filesystem, via `std::fs::read_dir`.
///
/// Children are described without following symlinks, so a link is a leaf
/// no matter what it points at.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

pub struct FsListing {
    entries: fs::ReadDir,
}

impl Iterator for FsListing {
    type Item = Result<RawEntry, ListingError>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.entries.next()? {
            Ok(entry) => entry,
            Err(source) => return Some(Err(ListingError { name: None, source })),
        };
        let name = entry.file_name();
        Some(match entry.metadata() {
            Ok(meta) => Ok(RawEntry {
                attributes: attributes_from_metadata(&name, &meta),
                size: meta.len(),
                name,
            }),
            Err(source) => Err(ListingError {
                name: Some(name),
                source,
            }),
        })
    }
}

impl DirListing for FsListing {
    fn close(self) -> io::Result<()> {
        // ReadDir releases its handle on drop and has no fallible close.
        drop(self.entries);
        Ok(())
    }
}

impl DirSource for FsSource {
    type Listing = FsListing;

    fn open(&self, path: &Path) -> io::Result<FsListing> {
        Ok(FsListing {
            entries: fs::read_dir(path)?,
        })
    }

    fn attributes(&self, path: &Path) -> io::Result<Attributes> {
        let meta = fs::metadata(path)?;
        let name = path.file_name().unwrap_or(path.as_os_str());
        Ok(attributes_from_metadata(name, &meta))
    }
}

fn attributes_from_metadata(name: &OsStr, meta: &fs::Metadata) -> Attributes {
    let mut attributes = Attributes::empty();
    if meta.is_dir() {
        attributes |= Attributes::DIRECTORY;
    }
    if meta.file_type().is_symlink() {
        attributes |= Attributes::SYMLINK;
    }
    if meta.permissions().readonly() {
        attributes |= Attributes::READONLY;
    }
    if is_hidden(name, meta) {
        attributes |= Attributes::HIDDEN;
    }
    attributes
}

#[cfg(windows)]
fn is_hidden(_name: &OsStr, meta: &fs::Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;

    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    meta.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
}

#[cfg(not(windows))]
fn is_hidden(name: &OsStr, _meta: &fs::Metadata) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('.') && name != "." && name != ".."
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn list(path: &Path) -> Vec<RawEntry> {
        let mut entries: Vec<_> = FsSource
            .open(path)
            .expect("open listing")
            .map(|r| r.expect("readable entry"))
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    #[test]
    fn test_fs_listing_reports_files_and_dirs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("data.bin"), vec![0u8; 123]).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let entries = list(dir.path());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "data.bin");
        assert_eq!(entries[0].size, 123);
        assert!(!entries[0].is_dir());
        assert_eq!(entries[1].name, "sub");
        assert!(entries[1].is_dir());
    }

    #[test]
    fn test_fs_listing_marks_hidden_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".secret"), "x").unwrap();

        let entries = list(dir.path());
        assert!(entries[0].attributes.contains(Attributes::HIDDEN));
    }

    #[cfg(unix)]
    #[test]
    fn test_fs_listing_does_not_follow_symlinks() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();

        let entries = list(dir.path());
        let link = entries.iter().find(|e| e.name == "link").unwrap();
        assert!(link.attributes.is_symlink());
        assert!(!link.is_dir());
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let err = FsSource.open(&dir.path().join("missing")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_root_attributes() {
        let dir = TempDir::new().unwrap();
        let attributes = FsSource.attributes(dir.path()).unwrap();
        assert!(attributes.is_dir());
        assert!(FsSource.attributes(&dir.path().join("missing")).is_err());
    }
}
