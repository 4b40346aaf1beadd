//! Measurement formatting and display
//!
//! - `tree` - one line per retained entry, with sizes and full paths
//! - `skipped` - the list of paths that could not be read
//! - `json` - JSON output of a whole measurement

mod config;
mod json;
mod skipped;
mod tree;

pub use config::OutputConfig;
pub use json::{JsonEntry, JsonReport, JsonSkipped, print_json};
pub use skipped::SkipReporter;
pub use tree::EntryFormatter;
