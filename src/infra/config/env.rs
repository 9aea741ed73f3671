use crate::app::ports::{DeploymentStore, DeploymentStoreError};
use crate::domain::Deployment;

pub const URL_VAR: &str = "MULTIMARMORE_URL";
pub const ANON_KEY_VAR: &str = "MULTIMARMORE_ANON_KEY";
pub const DEPLOYMENT_VAR: &str = "MULTIMARMORE_DEPLOYMENT";
pub const SCHEMA_VAR: &str = "MULTIMARMORE_SCHEMA";

const ENV_DEPLOYMENT_NAME: &str = "env";

pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Picks the deployment to talk to.
///
/// `MULTIMARMORE_URL` + `MULTIMARMORE_ANON_KEY` win over the config file.
/// Otherwise the explicitly requested name, then `MULTIMARMORE_DEPLOYMENT`,
/// then the file's default.
pub fn resolve_deployment<F>(
    store: &dyn DeploymentStore,
    requested: Option<&str>,
    env: F,
) -> Result<Deployment, DeploymentStoreError>
where
    F: Fn(&str) -> Option<String>,
{
    if let (Some(url), Some(key)) = (env(URL_VAR), env(ANON_KEY_VAR)) {
        let mut deployment = Deployment::new(ENV_DEPLOYMENT_NAME, url, key).map_err(|e| {
            DeploymentStoreError::InvalidDeployment {
                name: ENV_DEPLOYMENT_NAME.to_string(),
                reason: e.to_string(),
            }
        })?;
        if let Some(schema) = env(SCHEMA_VAR) {
            deployment = deployment.with_schema(schema);
        }
        return Ok(deployment);
    }

    let name = requested.map(str::to_string).or_else(|| env(DEPLOYMENT_VAR));
    match name {
        Some(name) => store
            .find(&name)?
            .ok_or(DeploymentStoreError::NotFound(name)),
        None => store
            .default_deployment()?
            .ok_or(DeploymentStoreError::NoDefault),
    }
}
