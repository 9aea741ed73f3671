pub mod backend_error;
pub mod deployment;
pub mod entities;
pub mod payload;
pub mod query;
pub mod resource;
pub mod write_result;

pub use backend_error::BackendError;
pub use deployment::{DEFAULT_MAX_RETRIES, Deployment, DeploymentError};
pub use entities::{
    AuditEntry, InventoryItem, InventoryKind, Location, Movement, MovementKind, Product, Profile,
    ProfileRole,
};
pub use payload::{PayloadError, Row, WritePayload};
pub use query::{Filter, FilterOp, Order, SelectQuery};
pub use resource::{Resource, UnknownResource};
pub use write_result::{FailureKind, RemovedColumns, SchemaSafeWrite, WriteFailure, WriteState};
