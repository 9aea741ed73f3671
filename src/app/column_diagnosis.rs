//! Recognises PostgREST "unknown column" rejections.
//!
//! PostgREST answers a write that names a column missing from its schema
//! cache with e.g. `Could not find the 'cor' column of 'produtos' in the
//! schema cache`. The match is a signature check, not a parser: any message
//! that mentions a column and the schema cache counts, in either order.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::BackendError;
use crate::ports::ErrorClassifier;

static MENTIONS_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bcolumn\b").expect("valid regex"));

static MENTIONS_SCHEMA_CACHE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bschema\s+cache\b").expect("valid regex"));

/// Tried in order; the first capture wins.
static COLUMN_NAME_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)could not find the '([^']+)' column").expect("valid regex"),
        Regex::new(r#"(?i)column "([^"]+)" of relation"#).expect("valid regex"),
    ]
});

pub fn is_unknown_column_error(error: &BackendError) -> bool {
    MENTIONS_COLUMN.is_match(&error.message) && MENTIONS_SCHEMA_CACHE.is_match(&error.message)
}

pub fn extract_column_name(message: &str) -> Option<String> {
    COLUMN_NAME_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Default classifier for the hosted PostgREST backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgrestColumnClassifier;

impl ErrorClassifier for PostgrestColumnClassifier {
    fn is_unknown_column(&self, error: &BackendError) -> bool {
        is_unknown_column_error(error)
    }

    fn extract_column(&self, message: &str) -> Option<String> {
        extract_column_name(message)
    }
}
