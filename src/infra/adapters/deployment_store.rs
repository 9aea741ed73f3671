use std::fs;
use std::path::PathBuf;

use crate::app::ports::{DeploymentStore, DeploymentStoreError};
use crate::config::deployments_file::{CURRENT_VERSION, DeploymentsFile};
use crate::domain::Deployment;

const CONFIG_FILE_NAME: &str = "deployments.toml";

pub struct TomlDeploymentStore {
    config_dir: PathBuf,
}

impl TomlDeploymentStore {
    pub fn new() -> Result<Self, DeploymentStoreError> {
        let config_dir = get_config_dir()?;
        Ok(Self { config_dir })
    }

    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    fn config_file_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    fn read_file(&self) -> Result<Option<DeploymentsFile>, DeploymentStoreError> {
        let path = self.config_file_path();

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| DeploymentStoreError::ReadError(e.to_string()))?;

        let file: DeploymentsFile = toml::from_str(&content)
            .map_err(|e| DeploymentStoreError::InvalidFormat(e.to_string()))?;

        if file.version != CURRENT_VERSION {
            return Err(DeploymentStoreError::VersionMismatch {
                found: file.version,
                expected: CURRENT_VERSION,
            });
        }

        Ok(Some(file))
    }
}

impl DeploymentStore for TomlDeploymentStore {
    fn load_all(&self) -> Result<Vec<Deployment>, DeploymentStoreError> {
        match self.read_file()? {
            Some(file) => file.to_deployments(),
            None => Ok(Vec::new()),
        }
    }

    fn find(&self, name: &str) -> Result<Option<Deployment>, DeploymentStoreError> {
        match self.read_file()? {
            Some(file) => file.to_deployment(name),
            None => Ok(None),
        }
    }

    fn default_deployment(&self) -> Result<Option<Deployment>, DeploymentStoreError> {
        let Some(file) = self.read_file()? else {
            return Ok(None);
        };
        match file.default_name() {
            Some(name) => file
                .to_deployment(name)?
                .map(Some)
                .ok_or_else(|| DeploymentStoreError::NotFound(name.to_string())),
            None => Ok(None),
        }
    }

    fn save(
        &self,
        deployment: &Deployment,
        make_default: bool,
    ) -> Result<(), DeploymentStoreError> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir)
                .map_err(|e| DeploymentStoreError::IoError(e.to_string()))?;
        }

        let mut file = self.read_file()?.unwrap_or_default();
        file.upsert(deployment);
        if make_default {
            file.default = Some(deployment.name.clone());
        }

        let content = toml::to_string_pretty(&file)
            .map_err(|e| DeploymentStoreError::WriteError(e.to_string()))?;

        let content_with_header = format!(
            "# multimarmore deployments\n# WARNING: anon keys are stored in plain text\n\n{}",
            content
        );

        let path = self.config_file_path();
        fs::write(&path, content_with_header)
            .map_err(|e| DeploymentStoreError::WriteError(e.to_string()))?;

        set_file_permissions(&path)?;

        Ok(())
    }

    fn storage_path(&self) -> PathBuf {
        self.config_file_path()
    }
}

fn get_config_dir() -> Result<PathBuf, DeploymentStoreError> {
    let config_base = dirs::config_dir()
        .ok_or_else(|| DeploymentStoreError::IoError("Could not find config directory".into()))?;
    Ok(config_base.join("multimarmore"))
}

#[cfg(unix)]
fn set_file_permissions(path: &std::path::Path) -> Result<(), DeploymentStoreError> {
    use std::os::unix::fs::PermissionsExt;
    let perms = fs::Permissions::from_mode(0o600);
    fs::set_permissions(path, perms).map_err(|e| DeploymentStoreError::IoError(e.to_string()))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_file_permissions(_path: &std::path::Path) -> Result<(), DeploymentStoreError> {
    Ok(())
}
