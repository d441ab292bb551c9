//! groupsync - report test-method group annotations and sync edited groups back.
//!
//! # Overview
//!
//! groupsync walks a source tree for test files, pairs every test marker
//! annotation with the method it decorates and extracts the groups the test
//! belongs to. The result is written as a CSV plus two group statistics files.
//! The CSV can be edited and fed back in, in which case the changed group
//! lists and annotations are written into the source files again.

pub mod annotation;
pub mod config;
pub mod discovery;
pub mod error;
pub mod groups;
pub mod report;
pub mod sync;

// Re-export commonly used types
pub use annotation::TestRecord;
pub use config::{MarkerTokens, ScanConfig};
pub use discovery::{ScanOutput, ScanSummary, search_directory};
pub use error::{GroupError, LiteralError, ReportError, RowWarning, ScanError, SyncError};
pub use groups::{GroupEncodingForm, decode_groups, encode_groups};
pub use report::{GroupStatistics, ReportPaths, generate_reports};
pub use sync::{RowOutcome, SyncOptions, SyncReport, process_csv};
