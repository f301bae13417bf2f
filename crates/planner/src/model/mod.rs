//! Timetable data model
mod semester;
mod types;

pub use semester::Semester;
pub use types::*;

use regex::Regex;
use std::sync::LazyLock;

static SUBJECT_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{4}[0-9]{4}$").unwrap());

/// Returns true if `name` looks like a subject code, e.g. "INFS3208".
pub fn is_subject_code(name: &str) -> bool {
    SUBJECT_CODE_REGEX.is_match(name)
}
