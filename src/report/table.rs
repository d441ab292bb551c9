//! CSV framing for test records.

use std::path::Path;

use csv::{ReaderBuilder, Terminator, WriterBuilder};

use crate::annotation::TestRecord;
use crate::error::ReportError;

/// Column header of the test case CSV.
pub const CSV_FIELD_NAMES: [&str; 7] = [
    "Filename",
    "Groups",
    "Annotation",
    "Associated Function",
    "Line Number",
    "Package",
    "Absolute Path",
];

/// Write records to `path`, header first, one row per record.
pub fn write_records(path: &Path, records: &[TestRecord]) -> Result<(), ReportError> {
    let csv_error = |source: csv::Error| ReportError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .has_headers(false)
        .from_path(path)
        .map_err(csv_error)?;

    // Written explicitly so an empty report still carries its header.
    writer.write_record(CSV_FIELD_NAMES).map_err(csv_error)?;
    for record in records {
        writer.serialize(record).map_err(csv_error)?;
    }

    writer.flush().map_err(|source| ReportError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Open a test case CSV for row-by-row deserialization.
pub fn open_records(path: &Path) -> Result<csv::Reader<std::fs::File>, csv::Error> {
    ReaderBuilder::new().has_headers(true).from_path(path)
}
