use std::fmt;

use crate::backend_error::BackendError;

/// Fields stripped from a payload during schema-safe retries, in removal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovedColumns(Vec<String>);

impl RemovedColumns {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Records `column`; a name already in the trace is ignored.
    pub fn push(&mut self, column: impl Into<String>) -> bool {
        let column = column.into();
        if self.0.contains(&column) {
            return false;
        }
        self.0.push(column);
        true
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.iter().any(|c| c == column)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl IntoIterator for RemovedColumns {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RemovedColumns {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Error did not match the unknown-column signature.
    NonRetryable,
    /// Unknown-column signature matched but no column name could be extracted.
    Unparseable,
    /// Diagnosed column is no longer in the working payload.
    ColumnAlreadyAbsent,
    /// Retry budget ran out while the backend kept reporting unknown columns.
    BudgetExhausted,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NonRetryable => "non-retryable",
            Self::Unparseable => "unparseable",
            Self::ColumnAlreadyAbsent => "column-already-absent",
            Self::BudgetExhausted => "budget-exhausted",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("write failed ({kind}): {error}")]
pub struct WriteFailure {
    pub kind: FailureKind,
    pub error: BackendError,
}

impl WriteFailure {
    pub fn new(kind: FailureKind, error: BackendError) -> Self {
        Self { kind, error }
    }
}

/// Outcome of a schema-safe write plus the removed-columns trace,
/// which is present whether or not the write succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSafeWrite<T> {
    pub outcome: Result<T, WriteFailure>,
    pub removed_columns: RemovedColumns,
}

impl<T> SchemaSafeWrite<T> {
    pub fn succeeded(data: T, removed_columns: RemovedColumns) -> Self {
        Self {
            outcome: Ok(data),
            removed_columns,
        }
    }

    pub fn failed(failure: WriteFailure, removed_columns: RemovedColumns) -> Self {
        Self {
            outcome: Err(failure),
            removed_columns,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn data(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }

    pub fn failure(&self) -> Option<&WriteFailure> {
        self.outcome.as_ref().err()
    }

    pub fn state(&self) -> WriteState {
        match &self.outcome {
            Ok(_) => WriteState::Succeeded,
            Err(failure) => WriteState::Failed(failure.kind),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SchemaSafeWrite<U> {
        SchemaSafeWrite {
            outcome: self.outcome.map(f),
            removed_columns: self.removed_columns,
        }
    }

    pub fn into_parts(self) -> (Result<T, WriteFailure>, RemovedColumns) {
        (self.outcome, self.removed_columns)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
    Attempting,
    Succeeded,
    Failed(FailureKind),
}

impl WriteState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Attempting)
    }
}
