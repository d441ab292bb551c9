//! Comparison of one stored record against the live annotation line.

use crate::annotation::TestRecord;
use crate::config::MarkerTokens;
use crate::error::GroupError;
use crate::groups::{UNKNOWN_GROUP, decode_groups, encode_groups, rewrite_annotation_line};

/// What part of an annotation line was rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The whole annotation text was replaced by the stored text.
    Annotation,
    /// Only the groups clause was re-encoded.
    Groups,
}

/// Result of reconciling one live line with a stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The line does not start with the test marker.
    NotAnnotation,
    /// The line already matches the record.
    Unchanged,
    /// The line must be replaced.
    Rewrite { line: String, change: Change },
    /// The groups differ but the line has no clause to re-encode.
    Unrecognized(GroupError),
}

/// Decide how `line` (with its terminator) must change to match `record`.
///
/// A differing annotation text wins over differing groups.
pub fn reconcile_line(line: &str, record: &TestRecord, markers: &MarkerTokens) -> Reconciliation {
    let stripped = line.trim();
    if !stripped.starts_with(markers.test_marker.as_str()) {
        return Reconciliation::NotAnnotation;
    }

    if stripped != record.marker_text {
        return Reconciliation::Rewrite {
            line: rewrite_annotation_line(line, &record.marker_text, &markers.test_marker),
            change: Change::Annotation,
        };
    }

    match decode_groups(line) {
        Ok(live) if live == record.groups => Reconciliation::Unchanged,
        Ok(_) => encode(line, &record.groups),
        // A clause-less annotation was reported with the placeholder group.
        Err(_) if is_unknown_placeholder(&record.groups) => Reconciliation::Unchanged,
        Err(_) => encode(line, &record.groups),
    }
}

fn encode(line: &str, groups: &[String]) -> Reconciliation {
    match encode_groups(line, groups) {
        Ok(line) => Reconciliation::Rewrite {
            line,
            change: Change::Groups,
        },
        Err(e) => Reconciliation::Unrecognized(e),
    }
}

fn is_unknown_placeholder(groups: &[String]) -> bool {
    matches!(groups, [only] if only == UNKNOWN_GROUP)
}
