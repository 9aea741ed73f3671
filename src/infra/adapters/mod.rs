pub mod deployment_store;
pub mod postgrest;

pub use deployment_store::TomlDeploymentStore;
pub use postgrest::PostgrestClient;
