use async_trait::async_trait;

use crate::domain::{BackendError, Filter, Resource, Row, SelectQuery, WritePayload};

/// What the backend answered: rows, or a structured rejection.
pub type BackendResponse = Result<Vec<Row>, BackendError>;

#[derive(Debug, Clone, PartialEq)]
pub enum BackendRequest {
    Select(SelectQuery),
    Insert {
        resource: Resource,
        payload: WritePayload,
    },
    Update {
        resource: Resource,
        filters: Vec<Filter>,
        payload: WritePayload,
    },
    Delete {
        resource: Resource,
        filters: Vec<Filter>,
    },
}

impl BackendRequest {
    pub fn resource(&self) -> Resource {
        match self {
            Self::Select(query) => query.resource,
            Self::Insert { resource, .. }
            | Self::Update { resource, .. }
            | Self::Delete { resource, .. } => *resource,
        }
    }

    pub fn is_write(&self) -> bool {
        !matches!(self, Self::Select(_))
    }
}

/// Failure to get any answer from the backend. Distinct from `BackendError`,
/// which is an answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Could not decode response: {0}")]
    Decode(String),
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendClient: Send + Sync {
    async fn execute(&self, request: &BackendRequest) -> Result<BackendResponse, TransportError>;
}
