//! Scripted canvas sessions.
//!
//! A scenario is a JSON list of steps replayed onto a [`Workspace`]. Placed
//! blocks get generated ids, so steps refer to them through aliases:
//!
//! ```json
//! { "steps": [
//!     { "action": "place", "template": "agent", "x": 400, "y": 200, "as": "a" },
//!     { "action": "place", "template": "send-email", "x": 900, "y": 600, "as": "mail" },
//!     { "action": "connect", "from": "a", "to": "mail", "kind": "agent-to-tool" },
//!     { "action": "configure", "block": "a", "values": { "nodeId": "scraper" } }
//! ] }
//! ```

use crate::canvas::{BlockId, CanvasSnapshot, ConnectionKind, Position};
use crate::configure::{DeploymentDescriptor, FormValues};
use crate::controller::{CanvasEvent, ControllerOutcome};
use crate::error::ScenarioError;
use crate::workspace::Workspace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Step {
    /// Drops a palette template with its centre on `(x, y)`.
    Place {
        template: String,
        x: f64,
        y: f64,
        #[serde(rename = "as", default)]
        alias: Option<String>,
    },
    Move {
        block: String,
        x: f64,
        y: f64,
    },
    Select {
        block: String,
    },
    Connect {
        from: String,
        to: String,
        kind: ConnectionKind,
    },
    Disconnect {
        from: String,
        to: String,
        kind: ConnectionKind,
    },
    Remove {
        block: String,
    },
    /// Selects the block, fills in its form and closes it again.
    Configure {
        block: String,
        values: FormValues,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Scenario {
    pub steps: Vec<Step>,
}

/// A connection the canvas refused during replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclinedStep {
    pub step: usize,
    pub reason: String,
}

/// The state left behind by a replay.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    pub snapshot: CanvasSnapshot,
    pub aliases: BTreeMap<String, BlockId>,
    pub descriptors: BTreeMap<String, DeploymentDescriptor>,
    pub declined: Vec<DeclinedStep>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        serde_json::from_str(json).map_err(|e| ScenarioError::JsonParseError(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| ScenarioError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Runs every step in order. The step index doubles as the clock for
    /// form saves.
    pub fn replay(&self, workspace: &mut Workspace) -> Result<ScenarioReport, ScenarioError> {
        let mut replay = Replay::default();
        for (step, action) in self.steps.iter().enumerate() {
            replay.apply(workspace, step, action)?;
        }
        Ok(ScenarioReport {
            snapshot: workspace.canvas().snapshot(),
            aliases: replay.aliases,
            descriptors: replay.descriptors,
            declined: replay.declined,
        })
    }
}

#[derive(Default)]
struct Replay {
    aliases: BTreeMap<String, BlockId>,
    descriptors: BTreeMap<String, DeploymentDescriptor>,
    declined: Vec<DeclinedStep>,
}

impl Replay {
    /// An alias, or failing that a literal block id on the canvas.
    fn resolve(&self, workspace: &Workspace, step: usize, name: &str) -> Result<BlockId, ScenarioError> {
        if let Some(id) = self.aliases.get(name) {
            return Ok(id.clone());
        }
        workspace
            .canvas()
            .block(name)
            .map(|b| b.id.clone())
            .ok_or_else(|| ScenarioError::UnknownAlias {
                step,
                alias: name.to_string(),
            })
    }

    fn apply(&mut self, workspace: &mut Workspace, step: usize, action: &Step) -> Result<(), ScenarioError> {
        let now = step as u64;
        log::debug!("Replaying step {}: {:?}", step, action);
        match action {
            Step::Place {
                template,
                x,
                y,
                alias,
            } => {
                let payload = workspace
                    .registry()
                    .get(template)
                    .ok_or_else(|| ScenarioError::UnknownTemplate {
                        step,
                        template: template.clone(),
                    })?
                    .to_payload();
                let event = CanvasEvent::PaletteDrop {
                    payload,
                    at: Position::new(*x, *y),
                };
                match workspace.handle(event, now) {
                    ControllerOutcome::Placed(id) => {
                        self.aliases
                            .insert(alias.clone().unwrap_or_else(|| id.to_string()), id);
                    }
                    other => log::warn!("Step {}: drop was not placed ({:?})", step, other),
                }
            }
            Step::Move { block, x, y } => {
                let id = self.resolve(workspace, step, block)?;
                workspace.canvas_mut().move_block(&id, Position::new(*x, *y));
            }
            Step::Select { block } => {
                let id = self.resolve(workspace, step, block)?;
                workspace.select(&id, now);
            }
            Step::Connect { from, to, kind } => {
                let from = self.resolve(workspace, step, from)?;
                let to = self.resolve(workspace, step, to)?;
                if let Err(reason) = workspace.canvas_mut().try_connect(&from, &to, *kind) {
                    self.declined.push(DeclinedStep {
                        step,
                        reason: reason.to_string(),
                    });
                }
            }
            Step::Disconnect { from, to, kind } => {
                let from = self.resolve(workspace, step, from)?;
                let to = self.resolve(workspace, step, to)?;
                workspace.canvas_mut().remove_connection(&from, &to, *kind);
            }
            Step::Remove { block } => {
                let id = self.resolve(workspace, step, block)?;
                workspace.remove_block(&id);
            }
            Step::Configure { block, values } => {
                let id = self.resolve(workspace, step, block)?;
                if workspace.select(&id, now).is_none() {
                    return Ok(());
                }
                if let Some(form) = workspace.form_mut() {
                    for (key, value) in values.iter() {
                        form.set_value(key, value, now);
                    }
                }
                workspace.close_form(now);
                if let Some(saved) = workspace.configurations().get(&id) {
                    self.descriptors
                        .insert(block.clone(), saved.descriptor.clone());
                }
            }
        }
        Ok(())
    }
}
