//! Error types for groupsync modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from decoding or re-encoding a groups clause.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    #[error("Failed to extract groups annotation from: {0}")]
    Parse(String),

    #[error("No groups clause in a recognized form on line: {}", .0.trim_end())]
    UnrecognizedForm(String),
}

/// Errors from parsing the list literal stored in the CSV `Groups` column.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid groups literal {input:?} at offset {offset}: {reason}")]
pub struct LiteralError {
    pub input: String,
    pub offset: usize,
    pub reason: &'static str,
}

/// Errors from scanning the source tree.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot search {path}: {source}")]
    SearchRoot {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk directory tree: {0}")]
    WalkFailed(#[source] walkdir::Error),
}

/// Errors from writing the CSV and statistics reports.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write CSV {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write report {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal errors from syncing a CSV back into source files.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to open CSV {path}: {source}")]
    CsvOpen {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to read modification time of {path}: {source}")]
    CsvMetadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Recoverable per-row conditions. The row is left unchanged and the next
/// row is processed.
#[derive(Error, Debug)]
pub enum RowWarning {
    #[error(
        "File {filename} was modified more recently than the input CSV ({modified} > {csv_modified}). \
         Not making changes to {path}. Pass --force-changes to override."
    )]
    StaleSource {
        filename: String,
        path: PathBuf,
        modified: String,
        csv_modified: String,
    },

    #[error("Cannot rewrite groups at line {line} of {path}: {source}")]
    UnrecognizedForm {
        path: PathBuf,
        line: usize,
        #[source]
        source: GroupError,
    },

    #[error("Failed to read {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    SourceWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Skipping malformed CSV row: {0}")]
    MalformedRow(#[source] csv::Error),
}
