use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SCHEMA: &str = "public";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentError {
    EmptyName,
    InvalidUrl(String),
    MissingAnonKey,
}

impl fmt::Display for DeploymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Deployment name cannot be empty"),
            Self::InvalidUrl(url) => {
                write!(f, "Deployment URL must start with http:// or https://: {}", url)
            }
            Self::MissingAnonKey => write!(f, "Deployment anon key cannot be empty"),
        }
    }
}

impl std::error::Error for DeploymentError {}

/// One hosted backend (production, staging, ...). Clients are built from an
/// explicit `Deployment` rather than from process-wide singletons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub name: String,
    pub url: String,
    pub anon_key: String,
    pub schema: String,
    pub timeout_secs: u64,
    pub max_retries: usize,
}

impl Deployment {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        anon_key: impl Into<String>,
    ) -> Result<Self, DeploymentError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DeploymentError::EmptyName);
        }

        let url = url.into().trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DeploymentError::InvalidUrl(url));
        }

        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(DeploymentError::MissingAnonKey);
        }

        Ok(Self {
            name,
            url,
            anon_key,
            schema: DEFAULT_SCHEMA.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }

    /// For logging - key replaced with ****
    pub fn masked_key(&self) -> String {
        let prefix: String = self.anon_key.chars().take(4).collect();
        format!("{}****", prefix)
    }
}
