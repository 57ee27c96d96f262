use super::{ActionDispatcher, Endpoint};
use crate::configure::DeploymentDescriptor;
use crate::error::DispatchError;
use serde::Serialize;
use serde_json::{Value, json};

pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

fn ensure_configured(dispatcher: &dyn ActionDispatcher, endpoint: Endpoint) -> Result<(), DispatchError> {
    if dispatcher.is_configured(endpoint) {
        Ok(())
    } else {
        Err(DispatchError::NotConfigured(endpoint))
    }
}

fn require_repo(repo: Option<&str>, endpoint: Endpoint) -> Result<&str, DispatchError> {
    repo.map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or(DispatchError::RepositoryRequired(endpoint))
}

/// `owner/name` → `name`; a bare name is returned unchanged.
pub fn bare_repo_name(path: &str) -> &str {
    match path.split_once('/') {
        Some((_, rest)) => rest.split('/').next().unwrap_or(rest),
        None => path,
    }
}

/// Creates the repository the workflow's code is committed to.
///
/// Returns the repository name without its owner prefix.
pub async fn create_repository(
    dispatcher: &dyn ActionDispatcher,
    name: &str,
) -> Result<String, DispatchError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DispatchError::InvalidInput(
            "Please enter a repository name".to_string(),
        ));
    }
    ensure_configured(dispatcher, Endpoint::RepoCreate)?;

    log::info!("Creating repository '{}'", name);
    let reply = dispatcher
        .post(Endpoint::RepoCreate, json!({ "name": name }))
        .await?;
    let full_name = reply
        .get("data")
        .and_then(Value::as_str)
        .or_else(|| reply.get("name").and_then(Value::as_str))
        .unwrap_or(name);
    let repo = bare_repo_name(full_name).to_string();
    log::info!("Repository '{}' created", repo);
    Ok(repo)
}

/// Commits one file of code to the repository.
pub async fn create_code_file(
    dispatcher: &dyn ActionDispatcher,
    repo: &str,
    path: &str,
    code: Value,
    commit_message: &str,
    github_user: Option<&str>,
) -> Result<Value, DispatchError> {
    ensure_configured(dispatcher, Endpoint::CodeDeploy)?;
    let mut body = json!({
        "code": code,
        "commitMessage": commit_message,
        "path": path,
        "repoName": repo,
    });
    if let Some(user) = github_user {
        body["githubUser"] = Value::String(user.to_string());
    }
    dispatcher.post(Endpoint::CodeDeploy, body).await
}

/// Sends an agent's descriptor to the agent service, then commits the code it
/// generates to the repository at `path`.
///
/// Both endpoints and the repository are checked before anything is sent.
pub async fn submit_agent(
    dispatcher: &dyn ActionDispatcher,
    descriptor: &DeploymentDescriptor,
    repo: Option<&str>,
    path: &str,
    github_user: Option<&str>,
) -> Result<Value, DispatchError> {
    ensure_configured(dispatcher, Endpoint::AgentSubmit)?;
    ensure_configured(dispatcher, Endpoint::CodeDeploy)?;
    let repo = require_repo(repo, Endpoint::AgentSubmit)?;

    log::info!("Submitting agent configuration for '{}'", path);
    let generated = dispatcher
        .post(Endpoint::AgentSubmit, descriptor.to_json())
        .await?;
    let code = match generated {
        Value::Null => Value::String(String::new()),
        other => other,
    };
    let deployed = create_code_file(
        dispatcher,
        repo,
        path,
        code,
        INITIAL_COMMIT_MESSAGE,
        github_user,
    )
    .await?;
    log::info!("Deployed agent code to '{}' in '{}'", path, repo);
    Ok(deployed)
}

/// A provisioned droplet, as far as the provisioning service reported it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Droplet {
    pub id: Option<String>,
    pub ip: Option<String>,
}

impl Droplet {
    fn from_reply(reply: &Value) -> Self {
        let root = reply.get("data").filter(|d| d.is_object()).unwrap_or(reply);
        Self {
            id: first_text(root, &["id", "dropletId"]),
            ip: first_text(root, &["ip", "ipAddress", "ip_address"]),
        }
    }
}

// First of `keys` holding a non-empty string or a number.
fn first_text(root: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| root.get(*k))
        .find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// Provisions a droplet to host the repository's service.
pub async fn create_droplet(
    dispatcher: &dyn ActionDispatcher,
    repo: Option<&str>,
) -> Result<Droplet, DispatchError> {
    ensure_configured(dispatcher, Endpoint::DropletCreate)?;
    let repo = require_repo(repo, Endpoint::DropletCreate)?;

    log::info!("Creating droplet for '{}'", repo);
    let reply = dispatcher
        .post(Endpoint::DropletCreate, json!({ "repoName": repo }))
        .await?;
    Ok(Droplet::from_reply(&reply))
}

/// Registers the droplet's deploy key with the repository.
pub async fn set_deploy_key(
    dispatcher: &dyn ActionDispatcher,
    repo: Option<&str>,
    droplet: &Droplet,
) -> Result<Value, DispatchError> {
    ensure_configured(dispatcher, Endpoint::DeployKey)?;
    let repo = require_repo(repo, Endpoint::DeployKey)?;

    log::info!("Setting deploy key for '{}'", repo);
    dispatcher
        .post(
            Endpoint::DeployKey,
            json!({ "repoName": repo, "dropletId": droplet.id, "host": droplet.ip }),
        )
        .await
}

/// Configures the repository's CI/CD pipeline.
pub async fn configure_ci_cd(
    dispatcher: &dyn ActionDispatcher,
    repo: Option<&str>,
) -> Result<Value, DispatchError> {
    ensure_configured(dispatcher, Endpoint::CiCdConfigure)?;
    let repo = require_repo(repo, Endpoint::CiCdConfigure)?;

    log::info!("Configuring CI/CD for '{}'", repo);
    let result = dispatcher
        .post(Endpoint::CiCdConfigure, json!({ "repoName": repo }))
        .await?;
    log::info!("CI/CD configured for '{}'", repo);
    Ok(result)
}
