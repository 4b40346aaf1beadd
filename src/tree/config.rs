//! Configuration types for scanning

/// Configuration for a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanConfig {
    /// Children smaller than this many bytes are pruned from each directory.
    pub threshold: u64,
}

impl ScanConfig {
    pub fn with_threshold(threshold: u64) -> Self {
        Self { threshold }
    }
}
