//! Test annotation scanning.

pub mod record;
pub mod scanner;

pub use record::TestRecord;
pub use scanner::{AnnotationSite, PendingAnnotation, ScannedFile, extract_function_name, scan};
