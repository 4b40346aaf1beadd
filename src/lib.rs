//! Heft - find the files and directories eating your disk

pub mod error;
pub mod output;
pub mod size;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{MeasureError, MeasureResult, SizeParseError};
pub use output::{EntryFormatter, OutputConfig, SkipReporter, print_json};
pub use size::{format_size, parse_size};
pub use tree::{Entry, Measurement, ScanConfig, Scanner, SkippedEntry, measure};
