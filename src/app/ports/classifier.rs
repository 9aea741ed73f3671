use crate::domain::BackendError;

/// Decides whether a backend rejection means "this column does not exist".
///
/// Message shapes differ between backend versions, so the retry loop only
/// talks to this trait.
pub trait ErrorClassifier: Send + Sync {
    fn is_unknown_column(&self, error: &BackendError) -> bool;

    fn extract_column(&self, message: &str) -> Option<String>;
}
