use std::path::PathBuf;

use crate::domain::Deployment;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentStoreError {
    VersionMismatch { found: u32, expected: u32 },
    ReadError(String),
    WriteError(String),
    InvalidFormat(String),
    InvalidDeployment { name: String, reason: String },
    IoError(String),
    NotFound(String),
    NoDefault,
}

impl std::fmt::Display for DeploymentStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VersionMismatch { found, expected } => {
                write!(
                    f,
                    "Config version mismatch: found {}, expected {}",
                    found, expected
                )
            }
            Self::ReadError(msg) => write!(f, "Read error: {}", msg),
            Self::WriteError(msg) => write!(f, "Write error: {}", msg),
            Self::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            Self::InvalidDeployment { name, reason } => {
                write!(f, "Invalid deployment '{}': {}", name, reason)
            }
            Self::IoError(msg) => write!(f, "IO error: {}", msg),
            Self::NotFound(name) => write!(f, "Deployment not found: {}", name),
            Self::NoDefault => write!(f, "No deployment configured"),
        }
    }
}

impl std::error::Error for DeploymentStoreError {}

pub trait DeploymentStore: Send + Sync {
    fn load_all(&self) -> Result<Vec<Deployment>, DeploymentStoreError>;

    fn find(&self, name: &str) -> Result<Option<Deployment>, DeploymentStoreError>;

    /// Named default, or the only deployment when exactly one is configured.
    fn default_deployment(&self) -> Result<Option<Deployment>, DeploymentStoreError>;

    fn save(
        &self,
        deployment: &Deployment,
        make_default: bool,
    ) -> Result<(), DeploymentStoreError>;

    fn storage_path(&self) -> PathBuf;
}
