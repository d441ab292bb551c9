//! Sync of an edited test case CSV back into the source files.

pub mod reconcile;
pub mod write;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::annotation::TestRecord;
use crate::config::MarkerTokens;
use crate::error::{RowWarning, SyncError};
use crate::report::open_records;

pub use reconcile::{Change, Reconciliation, reconcile_line};
pub use write::write_atomically;

/// Options for one sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Rewrite files even if they are newer than the CSV.
    pub force_changes: bool,
    pub markers: MarkerTokens,
}

/// Outcome of one CSV row.
#[derive(Debug)]
pub enum RowOutcome {
    /// The annotation line was rewritten and the file saved.
    Modified { path: PathBuf, line: usize, change: Change },
    /// Nothing was written, with the reason if the row was skipped.
    Unchanged(Option<RowWarning>),
    /// The recorded line no longer holds a test annotation.
    NotFound { path: PathBuf, line: usize },
}

impl RowOutcome {
    pub fn is_modified(&self) -> bool {
        matches!(self, RowOutcome::Modified { .. })
    }
}

/// Outcomes of all rows of one sync run, in CSV order.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub rows: Vec<RowOutcome>,
}

impl SyncReport {
    pub fn modified_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.is_modified()).count()
    }

    /// Distinct files written during the run.
    pub fn modified_files(&self) -> BTreeSet<&Path> {
        self.rows
            .iter()
            .filter_map(|r| match r {
                RowOutcome::Modified { path, .. } => Some(path.as_path()),
                _ => None,
            })
            .collect()
    }

    pub fn any_modified(&self) -> bool {
        self.rows.iter().any(RowOutcome::is_modified)
    }
}

/// Apply every row of the CSV at `csv_path` to its source file.
///
/// Only failing to open or stat the CSV itself is fatal. Every row problem is
/// logged, recorded in the report and the next row is processed.
pub fn process_csv(csv_path: &Path, options: &SyncOptions) -> Result<SyncReport, SyncError> {
    let mut reader = open_records(csv_path).map_err(|source| SyncError::CsvOpen {
        path: csv_path.to_path_buf(),
        source,
    })?;

    let csv_modified = std::fs::metadata(csv_path)
        .and_then(|m| m.modified())
        .map_err(|source| SyncError::CsvMetadata {
            path: csv_path.to_path_buf(),
            source,
        })?;

    let mut report = SyncReport::default();
    // Files rewritten by this run are newer than the CSV because of our own write.
    let mut written: BTreeSet<PathBuf> = BTreeSet::new();

    for row in reader.deserialize::<TestRecord>() {
        let outcome = match row {
            Ok(record) => process_row(&record, csv_modified, &written, options),
            Err(e) => RowOutcome::Unchanged(Some(RowWarning::MalformedRow(e))),
        };

        match &outcome {
            RowOutcome::Modified { path, .. } => {
                written.insert(path.clone());
            }
            RowOutcome::Unchanged(Some(warning)) => warn!("{}", warning),
            RowOutcome::Unchanged(None) => {}
            RowOutcome::NotFound { path, line } => warn!(
                "Incorrect annotation line number for file {}\n\
                 Expected {} annotation at line {}\n\
                 Try regenerating the CSV file to update the annotation line numbers.\n\
                 This will overwrite any changes you have made to the CSV file.",
                path.display(),
                options.markers.test_marker,
                line
            ),
        }

        report.rows.push(outcome);
    }

    Ok(report)
}

fn process_row(
    record: &TestRecord,
    csv_modified: SystemTime,
    written: &BTreeSet<PathBuf>,
    options: &SyncOptions,
) -> RowOutcome {
    let path = PathBuf::from(&record.absolute_path);

    let modified = match std::fs::metadata(&path).and_then(|m| m.modified()) {
        Ok(modified) => modified,
        Err(source) => return RowOutcome::Unchanged(Some(RowWarning::SourceRead { path, source })),
    };

    if modified > csv_modified && !options.force_changes && !written.contains(&path) {
        return RowOutcome::Unchanged(Some(RowWarning::StaleSource {
            filename: record.source_filename.clone(),
            path,
            modified: format_time(modified),
            csv_modified: format_time(csv_modified),
        }));
    }

    process_annotation(record, path, &options.markers)
}

/// Reconcile one record with its file and save the file if the line changed.
pub fn process_annotation(record: &TestRecord, path: PathBuf, markers: &MarkerTokens) -> RowOutcome {
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(source) => return RowOutcome::Unchanged(Some(RowWarning::SourceRead { path, source })),
    };

    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let line_number = record.line_number;
    let Some(idx) = line_number.checked_sub(1).filter(|idx| *idx < lines.len()) else {
        return RowOutcome::NotFound {
            path,
            line: line_number,
        };
    };

    let (new_line, change) = match reconcile_line(lines[idx], record, markers) {
        Reconciliation::NotAnnotation => {
            return RowOutcome::NotFound {
                path,
                line: line_number,
            };
        }
        Reconciliation::Unchanged => return RowOutcome::Unchanged(None),
        Reconciliation::Unrecognized(source) => {
            return RowOutcome::Unchanged(Some(RowWarning::UnrecognizedForm {
                path,
                line: line_number,
                source,
            }));
        }
        Reconciliation::Rewrite { line, change } => (line, change),
    };

    match change {
        Change::Annotation => info!(
            "Writing new annotation to line {} of {}:\n{}",
            line_number,
            path.display(),
            record.marker_text
        ),
        Change::Groups => info!(
            "Writing new groups to line {} of {}:\n{}",
            line_number,
            path.display(),
            new_line.trim_end()
        ),
    }

    let new_content: String = lines
        .iter()
        .enumerate()
        .map(|(i, line)| if i == idx { new_line.as_str() } else { *line })
        .collect();
    if let Err(source) = write_atomically(&path, &new_content) {
        return RowOutcome::Unchanged(Some(RowWarning::SourceWrite { path, source }));
    }

    RowOutcome::Modified {
        path,
        line: line_number,
        change,
    }
}

fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S%.3f")
        .to_string()
}
