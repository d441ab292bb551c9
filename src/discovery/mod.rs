//! Directory walk turning matching source files into test records.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::annotation::{TestRecord, scan};
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::groups::{UNKNOWN_GROUP, decode_groups};

/// Counters for one directory scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Files passing the filename filter.
    pub files_matched: usize,
    /// Matched files with at least one annotation.
    pub files_with_annotations: usize,
    /// Matched files that could not be read.
    pub files_skipped: usize,
    /// Matched files that were not valid UTF-8.
    pub lossy_files: usize,
    /// Annotations whose groups clause could not be decoded.
    pub group_parse_failures: usize,
    /// Markers dropped for lack of a declaration line.
    pub unterminated_markers: usize,
}

/// Records and counters from one directory scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    pub records: Vec<TestRecord>,
    pub summary: ScanSummary,
}

/// Walk the search root and scan every file passing the filename filter.
///
/// A search root that cannot be read fails the whole scan. Unreadable files
/// and directory entries below it are skipped with a warning.
pub fn search_directory(config: &ScanConfig) -> Result<ScanOutput, ScanError> {
    let mut output = ScanOutput::default();
    let root = absolute_root(&config.search_root);

    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(ScanError::SearchRoot { path: root, source: e });
            }
            Err(e) => {
                warn!("{}", ScanError::WalkFailed(e));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| config.matches_filename(name));
        if !matches {
            continue;
        }

        output.summary.files_matched += 1;
        match process_file(entry.path(), config, &mut output.summary) {
            Ok(records) => {
                if !records.is_empty() {
                    output.summary.files_with_annotations += 1;
                }
                output.records.extend(records);
            }
            Err(e) => {
                output.summary.files_skipped += 1;
                warn!("{}", e);
            }
        }
    }

    Ok(output)
}

/// Scan one file into test records.
///
/// Annotations with no decodable groups clause get the `UNKNOWN` group.
/// Files that are not valid UTF-8 are decoded lossily.
pub fn process_file(
    path: &Path,
    config: &ScanConfig,
    summary: &mut ScanSummary,
) -> Result<Vec<TestRecord>, ScanError> {
    let bytes = std::fs::read(path).map_err(|source| ScanError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let display_path = path.display();

    let content = String::from_utf8_lossy(&bytes);
    if matches!(content, Cow::Owned(_)) {
        summary.lossy_files += 1;
        warn!(
            "{} is not valid UTF-8, invalid bytes are replaced in the report",
            display_path
        );
    }

    let scanned = scan(content.lines(), &config.markers);

    for dropped in &scanned.unterminated {
        summary.unterminated_markers += 1;
        warn!(
            "Ignoring {} at line {} of {}: no declaration follows it",
            dropped.marker_text, dropped.line_number, display_path
        );
    }

    if scanned.annotations.is_empty() {
        info!("Did not find any test annotations in {}", display_path);
        return Ok(Vec::new());
    }

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let absolute_path = path.to_string_lossy().into_owned();
    let package_name = scanned.package_name.unwrap_or_default();

    let records: Vec<TestRecord> = scanned
        .annotations
        .into_iter()
        .map(|site| {
            let groups = decode_groups(&site.marker_text).unwrap_or_else(|e| {
                summary.group_parse_failures += 1;
                warn!("{} (line {} of {})", e, site.line_number, display_path);
                vec![UNKNOWN_GROUP.to_string()]
            });

            TestRecord {
                source_filename: filename.clone(),
                groups,
                function_name: site.function_name().to_string(),
                marker_text: site.marker_text,
                line_number: site.line_number,
                package_name: package_name.clone(),
                absolute_path: absolute_path.clone(),
            }
        })
        .collect();

    debug!("Found {} test annotations in {}", records.len(), display_path);
    Ok(records)
}

fn absolute_root(root: &Path) -> PathBuf {
    std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf())
}
