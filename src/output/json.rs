//! JSON output formatting

use std::io;
use std::path::Path;

use serde::Serialize;

use crate::size::format_size;
use crate::tree::{Entry, Measurement, SkippedEntry};

/// JSON form of an entry, with its path reconstructed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonEntry {
    File {
        name: String,
        path: String,
        size_bytes: u64,
        size_human: String,
    },
    Symlink {
        name: String,
        path: String,
        size_bytes: u64,
        size_human: String,
    },
    Dir {
        name: String,
        path: String,
        size_bytes: u64,
        size_human: String,
        children: Vec<JsonEntry>,
    },
}

impl JsonEntry {
    pub fn from_entry(prefix: &Path, entry: &Entry) -> Self {
        let full_path = prefix.join(entry.name());
        let name = entry.name().to_string_lossy().into_owned();
        let path = full_path.to_string_lossy().into_owned();
        let size_bytes = entry.size;
        let size_human = format_size(entry.size);

        if entry.is_dir() {
            JsonEntry::Dir {
                name,
                path,
                size_bytes,
                size_human,
                children: entry
                    .children
                    .iter()
                    .map(|c| JsonEntry::from_entry(&full_path, c))
                    .collect(),
            }
        } else if entry.attributes.is_symlink() {
            JsonEntry::Symlink {
                name,
                path,
                size_bytes,
                size_human,
            }
        } else {
            JsonEntry::File {
                name,
                path,
                size_bytes,
                size_human,
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonSkipped {
    pub path: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
}

impl From<&SkippedEntry> for JsonSkipped {
    fn from(entry: &SkippedEntry) -> Self {
        Self {
            path: entry.path().to_string_lossy().into_owned(),
            error: entry.message(),
            code: entry.code(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    pub threshold: u64,
    pub root: Option<JsonEntry>,
    pub skipped: Vec<JsonSkipped>,
}

impl JsonReport {
    pub fn new(measurement: &Measurement, threshold: u64) -> Self {
        Self {
            threshold,
            root: measurement
                .root
                .as_ref()
                .map(|r| JsonEntry::from_entry(Path::new(""), r)),
            skipped: measurement.skipped.iter().map(JsonSkipped::from).collect(),
        }
    }
}

/// Print a measurement as pretty-printed JSON to stdout.
pub fn print_json(measurement: &Measurement, threshold: u64) -> io::Result<()> {
    let report = JsonReport::new(measurement, threshold);
    let json = serde_json::to_string_pretty(&report).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}
