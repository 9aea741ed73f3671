pub mod backend;
pub mod classifier;
pub mod deployment_store;
pub mod exporter;

#[cfg(test)]
pub use backend::MockBackendClient;
pub use backend::{BackendClient, BackendRequest, BackendResponse, TransportError};
pub use classifier::ErrorClassifier;
pub use deployment_store::{DeploymentStore, DeploymentStoreError};
pub use exporter::{ExportError, ExportSummary, SpreadsheetExporter};
