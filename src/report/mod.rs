//! CSV report and group statistics files.

pub mod stats;
pub mod table;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::annotation::TestRecord;
use crate::error::ReportError;

pub use stats::{GroupEntry, GroupStatistics};
pub use table::{CSV_FIELD_NAMES, open_records, write_records};

/// File name of the count-per-group histogram.
pub const HISTOGRAM_FILE_NAME: &str = "group_membership_histogram.txt";

/// File name of the members-per-group listing.
pub const MEMBERSHIP_FILE_NAME: &str = "group_membership_lists.txt";

/// Output locations for one report run.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub csv: PathBuf,
    pub histogram: PathBuf,
    pub membership: PathBuf,
}

impl ReportPaths {
    /// CSV at `csv`, statistics files under `report_dir`.
    pub fn new(csv: impl Into<PathBuf>, report_dir: &Path) -> Self {
        Self {
            csv: csv.into(),
            histogram: report_dir.join(HISTOGRAM_FILE_NAME),
            membership: report_dir.join(MEMBERSHIP_FILE_NAME),
        }
    }
}

/// Write the CSV, the histogram and the membership listing.
pub fn generate_reports(
    records: &[TestRecord],
    paths: &ReportPaths,
) -> Result<GroupStatistics, ReportError> {
    info!("Writing data to {}", paths.csv.display());
    write_records(&paths.csv, records)?;

    let stats = GroupStatistics::from_records(records);

    info!("Writing group membership histogram to {}", paths.histogram.display());
    write_text(&paths.histogram, &stats.render_histogram())?;

    info!("Writing group membership lists to {}", paths.membership.display());
    write_text(&paths.membership, &stats.render_membership())?;

    Ok(stats)
}

fn write_text(path: &Path, content: &str) -> Result<(), ReportError> {
    std::fs::write(path, content).map_err(|source| ReportError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}
