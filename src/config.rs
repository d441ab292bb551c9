//! Run configuration shared by the scanner, the directory walk and the sync.

use std::path::PathBuf;

/// Default test-method marker token.
pub const DEFAULT_TEST_MARKER: &str = "@Test";

/// Default prefix of stacked metadata annotations between marker and declaration.
pub const DEFAULT_METADATA_PREFIX: &str = "@";

/// Default package statement keyword.
pub const DEFAULT_PACKAGE_PREFIX: &str = "package";

/// Fixed tokens that identify annotation, metadata and package lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerTokens {
    pub test_marker: String,
    pub metadata_prefix: String,
    pub package_prefix: String,
}

impl Default for MarkerTokens {
    fn default() -> Self {
        Self {
            test_marker: DEFAULT_TEST_MARKER.to_string(),
            metadata_prefix: DEFAULT_METADATA_PREFIX.to_string(),
            package_prefix: DEFAULT_PACKAGE_PREFIX.to_string(),
        }
    }
}

/// Configuration for one scan run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub search_root: PathBuf,
    pub filename_prefix: String,
    pub filename_suffix: String,
    pub markers: MarkerTokens,
}

impl ScanConfig {
    /// Create a configuration with the default `TC*.java` filter and markers.
    pub fn new(search_root: impl Into<PathBuf>) -> Self {
        Self {
            search_root: search_root.into(),
            filename_prefix: "TC".to_string(),
            filename_suffix: ".java".to_string(),
            markers: MarkerTokens::default(),
        }
    }

    /// Whether a file's basename passes the prefix/suffix filter.
    pub fn matches_filename(&self, filename: &str) -> bool {
        filename.starts_with(&self.filename_prefix) && filename.ends_with(&self.filename_suffix)
    }
}
