//! Calls to the services that sit outside the builder.
//!
//! Every action is a single JSON POST with no retry. The transport is behind
//! [`ActionDispatcher`] so the flows here can run against a fake in tests.

use crate::error::DispatchError;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

mod actions;
#[cfg(feature = "http")]
mod http;

pub use actions::*;
#[cfg(feature = "http")]
pub use http::HttpDispatcher;

/// The external services the builder talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    RepoCreate,
    AgentSubmit,
    CodeDeploy,
    DropletCreate,
    DeployKey,
    CiCdConfigure,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::RepoCreate,
        Endpoint::AgentSubmit,
        Endpoint::CodeDeploy,
        Endpoint::DropletCreate,
        Endpoint::DeployKey,
        Endpoint::CiCdConfigure,
    ];

    /// Environment variable holding the endpoint URL.
    pub fn env_var(&self) -> &'static str {
        match self {
            Endpoint::RepoCreate => "GLASSBOX_REPO_API_URL",
            Endpoint::AgentSubmit => "GLASSBOX_AGENT_API_URL",
            Endpoint::CodeDeploy => "GLASSBOX_CODE_DEPLOY_API_URL",
            Endpoint::DropletCreate => "GLASSBOX_DROPLET_API_URL",
            Endpoint::DeployKey => "GLASSBOX_DEPLOY_KEY_API_URL",
            Endpoint::CiCdConfigure => "GLASSBOX_CI_CD_API_URL",
        }
    }

    /// Path used when every endpoint hangs off one base URL.
    pub fn default_path(&self) -> &'static str {
        match self {
            Endpoint::RepoCreate => "/repos",
            Endpoint::AgentSubmit => "/agents",
            Endpoint::CodeDeploy => "/code",
            Endpoint::DropletCreate => "/droplets",
            Endpoint::DeployKey => "/deploy-keys",
            Endpoint::CiCdConfigure => "/ci-cd",
        }
    }

    /// What the action was doing, for "Error <action>: ..." messages.
    pub fn action(&self) -> &'static str {
        match self {
            Endpoint::RepoCreate => "creating repository",
            Endpoint::AgentSubmit => "submitting agent configuration",
            Endpoint::CodeDeploy => "deploying code",
            Endpoint::DropletCreate => "creating droplet",
            Endpoint::DeployKey => "setting deploy key",
            Endpoint::CiCdConfigure => "configuring CI/CD",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Endpoint::RepoCreate => "Repo API",
            Endpoint::AgentSubmit => "Agent API",
            Endpoint::CodeDeploy => "Code deploy API",
            Endpoint::DropletCreate => "Droplet API",
            Endpoint::DeployKey => "Deploy key API",
            Endpoint::CiCdConfigure => "Configure CI/CD API",
        };
        f.write_str(label)
    }
}

/// Transport for the external actions.
#[async_trait]
pub trait ActionDispatcher: Send + Sync {
    /// Whether a URL is known for `endpoint`.
    fn is_configured(&self, endpoint: Endpoint) -> bool;

    /// POSTs `body` as JSON and returns the decoded JSON reply.
    ///
    /// Non-success statuses become [`DispatchError::Rejected`] carrying the
    /// reply's `message` field.
    async fn post(&self, endpoint: Endpoint, body: Value) -> Result<Value, DispatchError>;
}
