//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use filetime::FileTime;

/// Get the path to test fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Get the path to the fixture source tree.
pub fn suite_dir() -> PathBuf {
    fixtures_dir().join("suite")
}

/// Read a file as a string.
pub fn read_fixture(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {:?}: {}", path, e))
}

/// Create a temporary directory for test output.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Copy the fixture source tree into a fresh temp directory.
pub fn copy_suite() -> tempfile::TempDir {
    let dir = temp_test_dir();
    copy_dir(&suite_dir(), dir.path());
    dir
}

fn copy_dir(from: &Path, to: &Path) {
    std::fs::create_dir_all(to).expect("Failed to create directory");
    for entry in std::fs::read_dir(from).expect("Failed to read fixture directory") {
        let entry = entry.expect("Failed to read directory entry");
        let target = to.join(entry.file_name());
        if entry.file_type().expect("Failed to read file type").is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            std::fs::copy(entry.path(), &target).expect("Failed to copy fixture");
        }
    }
}

/// Set a file's modification time to `seconds` after the Unix epoch.
pub fn set_mtime(path: impl AsRef<Path>, seconds: i64) {
    filetime::set_file_mtime(path.as_ref(), FileTime::from_unix_time(seconds, 0))
        .expect("Failed to set mtime");
}
