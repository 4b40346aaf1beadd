//! Directory measurement
//!
//! This module builds an in-memory tree of a directory annotated with sizes:
//!
//! - `Scanner`: walks a directory depth-first, totals sizes bottom-up and
//!   prunes entries below a threshold
//! - `DirSource`: the directory listing primitive the scanner reads from,
//!   implemented for the real filesystem by `FsSource`

mod builder;
mod config;
mod entry;
mod source;

// Re-export public types
pub use builder::{Scanner, measure};
pub use config::ScanConfig;
pub use entry::{Attributes, Entry, Measurement, SkippedEntry};
pub use source::{DirListing, DirSource, FsListing, FsSource, ListingError, RawEntry};
