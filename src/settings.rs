use crate::dispatch::Endpoint;
use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Where the external actions are sent.
///
/// Every endpoint is optional; an action whose endpoint is missing fails with
/// a configuration error instead of making a call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub repo_api_url: Option<String>,
    pub agent_api_url: Option<String>,
    pub code_deploy_api_url: Option<String>,
    pub droplet_api_url: Option<String>,
    pub deploy_key_api_url: Option<String>,
    pub ci_cd_api_url: Option<String>,
    /// Account the generated code is committed under.
    pub github_user: Option<String>,
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|e| SettingsError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Settings taken from `GLASSBOX_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Settings taken from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            repo_api_url: read(Endpoint::RepoCreate.env_var()),
            agent_api_url: read(Endpoint::AgentSubmit.env_var()),
            code_deploy_api_url: read(Endpoint::CodeDeploy.env_var()),
            droplet_api_url: read(Endpoint::DropletCreate.env_var()),
            deploy_key_api_url: read(Endpoint::DeployKey.env_var()),
            ci_cd_api_url: read(Endpoint::CiCdConfigure.env_var()),
            github_user: read("GLASSBOX_GITHUB_USER"),
        }
    }

    /// File settings (if a path is given) with the environment layered on top.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(base.merged_with(Self::from_env()))
    }

    /// Values present in `overrides` replace ours.
    pub fn merged_with(self, overrides: Settings) -> Self {
        Self {
            repo_api_url: overrides.repo_api_url.or(self.repo_api_url),
            agent_api_url: overrides.agent_api_url.or(self.agent_api_url),
            code_deploy_api_url: overrides.code_deploy_api_url.or(self.code_deploy_api_url),
            droplet_api_url: overrides.droplet_api_url.or(self.droplet_api_url),
            deploy_key_api_url: overrides.deploy_key_api_url.or(self.deploy_key_api_url),
            ci_cd_api_url: overrides.ci_cd_api_url.or(self.ci_cd_api_url),
            github_user: overrides.github_user.or(self.github_user),
        }
    }

    pub fn url(&self, endpoint: Endpoint) -> Option<&str> {
        let url = match endpoint {
            Endpoint::RepoCreate => &self.repo_api_url,
            Endpoint::AgentSubmit => &self.agent_api_url,
            Endpoint::CodeDeploy => &self.code_deploy_api_url,
            Endpoint::DropletCreate => &self.droplet_api_url,
            Endpoint::DeployKey => &self.deploy_key_api_url,
            Endpoint::CiCdConfigure => &self.ci_cd_api_url,
        };
        url.as_deref().filter(|u| !u.trim().is_empty())
    }

    /// A copy with every endpoint pointed at `base` plus a per-endpoint path.
    pub fn all_under(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        let at = |endpoint: Endpoint| Some(format!("{}{}", base, endpoint.default_path()));
        Self {
            repo_api_url: at(Endpoint::RepoCreate),
            agent_api_url: at(Endpoint::AgentSubmit),
            code_deploy_api_url: at(Endpoint::CodeDeploy),
            droplet_api_url: at(Endpoint::DropletCreate),
            deploy_key_api_url: at(Endpoint::DeployKey),
            ci_cd_api_url: at(Endpoint::CiCdConfigure),
            github_user: None,
        }
    }
}
