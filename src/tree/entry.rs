//! Measured tree types

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};

use bitflags::bitflags;

bitflags! {
    /// Attributes of a filesystem object, captured when it was enumerated.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attributes: u32 {
        const DIRECTORY = 1 << 0;
        const SYMLINK = 1 << 1;
        const READONLY = 1 << 2;
        const HIDDEN = 1 << 3;
    }
}

impl Attributes {
    pub fn is_dir(self) -> bool {
        self.contains(Attributes::DIRECTORY)
    }

    pub fn is_symlink(self) -> bool {
        self.contains(Attributes::SYMLINK)
    }
}

/// One node of a measured tree.
///
/// `name` is the path segment relative to the parent entry. For the root
/// it is the path the scan was started from, so joining names from the
/// root downwards reconstructs each entry's full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: OsString,
    /// Bytes in this file, or for a directory the sum of all its children
    /// as enumerated, including those later pruned from `children`.
    pub size: u64,
    pub attributes: Attributes,
    /// Retained children in enumeration order. Always empty for files.
    pub children: Vec<Entry>,
}

impl Entry {
    pub fn file(name: impl Into<OsString>, size: u64, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            size,
            attributes,
            children: Vec::new(),
        }
    }

    pub fn dir(name: impl Into<OsString>, children: Vec<Entry>, attributes: Attributes) -> Self {
        let size = children.iter().map(|c| c.size).sum();
        Self {
            name: name.into(),
            size,
            attributes: attributes | Attributes::DIRECTORY,
            children,
        }
    }

    pub fn name(&self) -> &OsStr {
        &self.name
    }

    pub fn is_dir(&self) -> bool {
        self.attributes.is_dir()
    }

    /// Drop every immediate child smaller than `threshold`.
    ///
    /// Only this level is pruned; `size` keeps the pre-prune total.
    pub fn prune(&mut self, threshold: u64) {
        self.children.retain(|child| child.size >= threshold);
    }

    /// Count (directories, files) in this subtree, this entry included.
    pub fn counts(&self) -> (usize, usize) {
        let own = if self.is_dir() { (1, 0) } else { (0, 1) };
        self.children.iter().fold(own, |(dirs, files), child| {
            let (d, f) = child.counts();
            (dirs + d, files + f)
        })
    }
}

/// A path that could not be enumerated, kept so the scan can carry on.
#[derive(Debug)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: io::Error,
}

impl SkippedEntry {
    pub fn new(path: impl Into<PathBuf>, reason: io::Error) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw platform error number, when the failure came from the OS.
    pub fn code(&self) -> Option<i32> {
        self.reason.raw_os_error()
    }

    /// Human-readable description of why the path was skipped.
    pub fn message(&self) -> String {
        let text = self.reason.to_string();
        if let Some(code) = self.code() {
            let suffix = format!(" (os error {})", code);
            if let Some(stripped) = text.strip_suffix(&suffix) {
                return stripped.to_string();
            }
        }
        text
    }
}

/// Result of measuring a scan root.
#[derive(Debug, Default)]
pub struct Measurement {
    /// `None` when the root itself could not be read.
    pub root: Option<Entry>,
    /// Unreadable paths in depth-first discovery order.
    pub skipped: Vec<SkippedEntry>,
}

impl Measurement {
    pub fn total_size(&self) -> Option<u64> {
        self.root.as_ref().map(|r| r.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_size_is_sum_of_children() {
        let dir = Entry::dir(
            "d",
            vec![
                Entry::file("a", 10, Attributes::empty()),
                Entry::file("b", 32, Attributes::empty()),
            ],
            Attributes::empty(),
        );
        assert_eq!(dir.size, 42);
        assert!(dir.is_dir());
    }

    #[test]
    fn test_prune_keeps_boundary_and_total() {
        let mut dir = Entry::dir(
            "d",
            vec![
                Entry::file("small", 99, Attributes::empty()),
                Entry::file("exact", 100, Attributes::empty()),
                Entry::file("big", 500, Attributes::empty()),
            ],
            Attributes::empty(),
        );
        dir.prune(100);
        let names: Vec<_> = dir.children.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["exact", "big"]);
        assert_eq!(dir.size, 699);
    }

    #[test]
    fn test_prune_zero_threshold_keeps_everything() {
        let mut dir = Entry::dir(
            "d",
            vec![
                Entry::file("empty", 0, Attributes::empty()),
                Entry::dir("sub", Vec::new(), Attributes::empty()),
            ],
            Attributes::empty(),
        );
        dir.prune(0);
        assert_eq!(dir.children.len(), 2);
    }

    #[test]
    fn test_counts() {
        let tree = Entry::dir(
            "root",
            vec![
                Entry::file("a", 1, Attributes::empty()),
                Entry::dir(
                    "sub",
                    vec![Entry::file("b", 2, Attributes::empty())],
                    Attributes::empty(),
                ),
            ],
            Attributes::empty(),
        );
        assert_eq!(tree.counts(), (2, 2));
    }

    #[test]
    fn test_skipped_entry_message_translates_os_error() {
        let skipped = SkippedEntry::new("/locked", io::Error::from_raw_os_error(2));
        assert_eq!(skipped.code(), Some(2));
        assert!(!skipped.message().is_empty());
        assert!(!skipped.message().contains("os error"));
    }
}
