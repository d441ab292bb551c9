//! One row of the test case report.

use serde::{Deserialize, Serialize};

/// A test method found by the scanner, serialized as one CSV row.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    #[serde(rename = "Filename")]
    pub source_filename: String,

    #[serde(rename = "Groups", with = "crate::groups::literal")]
    pub groups: Vec<String>,

    #[serde(rename = "Annotation")]
    pub marker_text: String,

    #[serde(rename = "Associated Function")]
    pub function_name: String,

    #[serde(rename = "Line Number")]
    pub line_number: usize,

    #[serde(rename = "Package")]
    pub package_name: String,

    #[serde(rename = "Absolute Path")]
    pub absolute_path: String,
}

impl TestRecord {
    /// `filename:line function` entry used in the group membership listing.
    ///
    /// The line is one past the marker line.
    pub fn membership_entry(&self) -> String {
        format!(
            "{}:{} {}",
            self.source_filename,
            self.line_number + 1,
            self.function_name
        )
    }
}
