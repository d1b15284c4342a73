//! CSV rendering for course exports.
//!
//! Fields are quoted only when they contain a delimiter, a quote, or a line
//! break; embedded quotes are doubled.

use std::borrow::Cow;

/// Header row of the course export.
pub const COURSE_CSV_HEADER: &[&str] = &[
    "id",
    "title",
    "description",
    "ends_at",
    "total_duration",
    "video_count",
];

/// Quote a single CSV field if needed.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Append one CSV record (with trailing newline) to `out`.
pub fn push_record<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(field.as_ref()));
    }
    out.push('\n');
}
