//! Prelude module for convenient imports
//!
//! Re-exports the types most callers need to build, configure and deploy a
//! workflow.
//!
//! # Example
//!
//! ```rust,no_run
//! use glassbox::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let scenario = Scenario::from_file("path/to/scenario.json")?;
//! let mut workspace = Workspace::new();
//! let report = scenario.replay(&mut workspace)?;
//!
//! println!("{}", serde_json::to_string_pretty(&report.snapshot)?);
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::canvas::{
    BlockId, BlockInstance, CanvasModel, CanvasSnapshot, Connection, ConnectionKind, Position,
};
pub use crate::registry::{BlockCategory, BlockTemplate, Registry};

// Interaction
pub use crate::controller::{CanvasEvent, ControllerOutcome, DragController};
pub use crate::workspace::Workspace;

// Configuration
pub use crate::configure::{DeploymentDescriptor, FormKind, FormSession, FormValues};

// External actions
#[cfg(feature = "http")]
pub use crate::dispatch::HttpDispatcher;
pub use crate::dispatch::{ActionDispatcher, Endpoint};
pub use crate::settings::Settings;

// Scripted sessions
pub use crate::scenario::{Scenario, ScenarioReport};

// Error types
pub use crate::error::{
    ConnectionError, DispatchError, PayloadError, ScenarioError, SettingsError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
