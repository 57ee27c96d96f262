use crate::canvas::{BlockId, ConnectionKind};
use crate::dispatch::Endpoint;
use thiserror::Error;

/// Reasons a connection request is declined by the canvas model.
///
/// `CanvasModel::connect` swallows these and reports a no-op; callers that
/// want the reason use `CanvasModel::try_connect`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Block '{0}' is not on the canvas")]
    UnknownBlock(BlockId),

    #[error("Block '{0}' cannot be connected to itself")]
    SelfLoop(BlockId),

    #[error("Block '{block_id}' cannot start a {kind} connection")]
    InvalidSource { block_id: BlockId, kind: ConnectionKind },

    #[error("Block '{block_id}' cannot be the target of a {kind} connection")]
    InvalidTarget { block_id: BlockId, kind: ConnectionKind },

    #[error("A {kind} connection from '{from}' to '{to}' already exists")]
    Duplicate {
        from: BlockId,
        to: BlockId,
        kind: ConnectionKind,
    },

    #[error("Block '{target}' is already attached to agent '{parent}'")]
    TargetAlreadyParented { target: BlockId, parent: BlockId },
}

/// Errors raised while decoding a block template dropped from the palette.
#[derive(Error, Debug, Clone)]
pub enum PayloadError {
    #[error("Failed to parse block payload: {0}")]
    Malformed(String),

    #[error("Block payload is missing a template id")]
    MissingId,
}

/// Failures of the external actions (repository, agent, droplet, CI/CD calls).
///
/// The `Display` text is what the UI shows in its blocking alert.
#[derive(Error, Debug, Clone)]
pub enum DispatchError {
    #[error("{0} URL not configured. Please check your environment variables.")]
    NotConfigured(Endpoint),

    /// The action behind `endpoint` needs a repository that does not exist yet.
    #[error("{}", repository_hint(.0))]
    RepositoryRequired(Endpoint),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Error {action}: {message}")]
    Rejected {
        action: String,
        status: u16,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),
}

fn repository_hint(endpoint: &Endpoint) -> &'static str {
    match endpoint {
        Endpoint::CiCdConfigure => "Please create a repository first before configuring CI/CD.",
        _ => "Please create a repository first using the \"Create Repo\" button.",
    }
}

/// Errors raised while loading endpoint settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Could not read settings file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file '{path}': {message}")]
    Parse { path: String, message: String },
}

/// Errors raised while replaying a canvas scenario script.
#[derive(Error, Debug, Clone)]
pub enum ScenarioError {
    #[error("Could not read scenario file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse scenario script: {0}")]
    JsonParseError(String),

    #[error("Step {step}: template '{template}' is not in the block registry")]
    UnknownTemplate { step: usize, template: String },

    #[error("Step {step}: no block was placed under the alias '{alias}'")]
    UnknownAlias { step: usize, alias: String },
}
