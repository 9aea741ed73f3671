use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::app::ports::DeploymentStoreError;
use crate::domain::Deployment;

pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct DeploymentsFile {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub deployments: BTreeMap<String, DeploymentEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentEntry {
    pub url: String,
    pub anon_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<usize>,
}

impl Default for DeploymentsFile {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            default: None,
            deployments: BTreeMap::new(),
        }
    }
}

impl DeploymentsFile {
    pub fn to_deployment(&self, name: &str) -> Result<Option<Deployment>, DeploymentStoreError> {
        self.deployments
            .get(name)
            .map(|entry| entry.to_deployment(name))
            .transpose()
    }

    pub fn to_deployments(&self) -> Result<Vec<Deployment>, DeploymentStoreError> {
        self.deployments
            .iter()
            .map(|(name, entry)| entry.to_deployment(name))
            .collect()
    }

    pub fn default_name(&self) -> Option<&str> {
        if let Some(name) = self.default.as_deref() {
            return Some(name);
        }
        match self.deployments.keys().collect::<Vec<_>>().as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    pub fn upsert(&mut self, deployment: &Deployment) {
        self.deployments
            .insert(deployment.name.clone(), DeploymentEntry::from_deployment(deployment));
    }
}

impl DeploymentEntry {
    pub fn from_deployment(deployment: &Deployment) -> Self {
        Self {
            url: deployment.url.clone(),
            anon_key: deployment.anon_key.clone(),
            schema: Some(deployment.schema.clone()),
            timeout_secs: Some(deployment.timeout_secs),
            max_retries: Some(deployment.max_retries),
        }
    }

    pub fn to_deployment(&self, name: &str) -> Result<Deployment, DeploymentStoreError> {
        let mut deployment = Deployment::new(name, &self.url, &self.anon_key).map_err(|e| {
            DeploymentStoreError::InvalidDeployment {
                name: name.to_string(),
                reason: e.to_string(),
            }
        })?;
        if let Some(schema) = &self.schema {
            deployment = deployment.with_schema(schema.clone());
        }
        if let Some(timeout_secs) = self.timeout_secs {
            deployment = deployment.with_timeout_secs(timeout_secs);
        }
        if let Some(max_retries) = self.max_retries {
            deployment = deployment.with_max_retries(max_retries);
        }
        Ok(deployment)
    }
}
