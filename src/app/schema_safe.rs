//! Writes that survive backend schema drift.
//!
//! When the backend rejects a write because one of the payload fields is not
//! a known column (typically a column that has not been migrated yet), the
//! field is dropped and the write is retried. One field is dropped per
//! attempt and the operation runs at most `max_retries + 1` times.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::column_diagnosis::PostgrestColumnClassifier;
use crate::domain::{
    BackendError, DEFAULT_MAX_RETRIES, FailureKind, RemovedColumns, SchemaSafeWrite, WriteFailure,
    WritePayload,
};
use crate::ports::ErrorClassifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryOptions {
    pub max_retries: usize,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl RetryOptions {
    pub fn with_max_retries(max_retries: usize) -> Self {
        Self { max_retries }
    }
}

#[derive(Clone)]
pub struct SchemaSafeWriter {
    classifier: Arc<dyn ErrorClassifier>,
    options: RetryOptions,
}

impl SchemaSafeWriter {
    pub fn new(options: RetryOptions) -> Self {
        Self::with_classifier(Arc::new(PostgrestColumnClassifier), options)
    }

    pub fn with_classifier(classifier: Arc<dyn ErrorClassifier>, options: RetryOptions) -> Self {
        Self {
            classifier,
            options,
        }
    }

    pub fn options(&self) -> RetryOptions {
        self.options
    }

    /// Runs `operation` against a private copy of `payload`, stripping
    /// unknown columns between attempts.
    ///
    /// Backend rejections come back inside the returned `SchemaSafeWrite`;
    /// only the operation's own error type `E` (transport failures) is
    /// propagated through the outer `Result`.
    pub async fn execute<T, E, F, Fut>(
        &self,
        payload: &WritePayload,
        mut operation: F,
    ) -> Result<SchemaSafeWrite<T>, E>
    where
        F: FnMut(WritePayload) -> Fut,
        Fut: Future<Output = Result<Result<T, BackendError>, E>>,
    {
        let mut working = payload.clone();
        let mut removed = RemovedColumns::new();
        let mut retries = 0;

        loop {
            let error = match operation(working.clone()).await? {
                Ok(data) => return Ok(SchemaSafeWrite::succeeded(data, removed)),
                Err(error) => error,
            };

            let column = match self.diagnose(&error, &working) {
                Ok(column) => column,
                Err(kind) => {
                    debug!(kind = %kind, error = %error, "write failed without retry");
                    return Ok(SchemaSafeWrite::failed(
                        WriteFailure::new(kind, error),
                        removed,
                    ));
                }
            };

            if retries >= self.options.max_retries {
                warn!(
                    column = %column,
                    max_retries = self.options.max_retries,
                    removed = ?removed.as_slice(),
                    "schema-safe write retry budget exhausted"
                );
                return Ok(SchemaSafeWrite::failed(
                    WriteFailure::new(FailureKind::BudgetExhausted, error),
                    removed,
                ));
            }

            working.remove(&column);
            debug!(column = %column, attempt = retries + 1, "dropping unknown column and retrying");
            removed.push(column);
            retries += 1;
        }
    }

    /// Column to drop for a retry, or why no retry is possible.
    fn diagnose(&self, error: &BackendError, working: &WritePayload) -> Result<String, FailureKind> {
        if !self.classifier.is_unknown_column(error) {
            return Err(FailureKind::NonRetryable);
        }
        let column = self
            .classifier
            .extract_column(&error.message)
            .ok_or(FailureKind::Unparseable)?;
        if !working.contains(&column) {
            return Err(FailureKind::ColumnAlreadyAbsent);
        }
        Ok(column)
    }
}

impl Default for SchemaSafeWriter {
    fn default() -> Self {
        Self::new(RetryOptions::default())
    }
}

/// Schema-safe write with the default PostgREST classifier.
pub async fn with_schema_safe_retry<T, E, F, Fut>(
    payload: &WritePayload,
    operation: F,
    options: RetryOptions,
) -> Result<SchemaSafeWrite<T>, E>
where
    F: FnMut(WritePayload) -> Fut,
    Fut: Future<Output = Result<Result<T, BackendError>, E>>,
{
    SchemaSafeWriter::new(options)
        .execute(payload, operation)
        .await
}
