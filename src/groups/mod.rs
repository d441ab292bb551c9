//! Group declarations: the annotation clause codec and the CSV list literal.

pub mod codec;
pub mod literal;

pub use codec::{
    GroupEncodingForm, decode_groups, detect_form, encode_groups, format_bracket_list,
    rewrite_annotation_line,
};
pub use literal::{parse_literal, to_literal};

/// Group assigned to a test whose annotation has no recognizable groups clause.
pub const UNKNOWN_GROUP: &str = "UNKNOWN";
