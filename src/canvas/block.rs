use super::geometry::Position;
use crate::registry::{BlockCategory, BlockTemplate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Identifier of a placed block: `<template id>-<millisecond stamp>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The trailing six characters, used to derive workflow ids.
    pub fn short(&self) -> &str {
        let start = self
            .0
            .char_indices()
            .rev()
            .nth(5)
            .map_or(0, |(index, _)| index);
        &self.0[start..]
    }
}

impl Deref for BlockId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BlockId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A block placed on the canvas.
///
/// Display metadata is copied from the template at placement time and never
/// refreshed from the registry afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockInstance {
    pub id: BlockId,
    pub template_id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub category: BlockCategory,
    pub agent_like: bool,
    pub position: Position,
    pub selected: bool,
}

impl BlockInstance {
    pub(crate) fn from_template(template: &BlockTemplate, id: BlockId, position: Position) -> Self {
        Self {
            id,
            template_id: template.id.clone(),
            title: template.title.clone(),
            description: template.description.clone(),
            icon: template.icon.clone(),
            color: template.color.clone(),
            category: template.category,
            agent_like: template.agent_like,
            position,
            selected: false,
        }
    }

    /// Whether this block may start a connection.
    pub fn is_agent_capable(&self) -> bool {
        self.category == BlockCategory::Agent || self.agent_like
    }

    /// Whether this block may be the target of an agent-to-tool connection.
    pub fn is_tool(&self) -> bool {
        matches!(self.category, BlockCategory::Output | BlockCategory::Tool)
    }

    pub fn center(&self) -> Position {
        self.position.block_center()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionKind {
    AgentToTool,
    AgentToAgent,
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionKind::AgentToTool => f.write_str("agent-to-tool"),
            ConnectionKind::AgentToAgent => f.write_str("agent-to-agent"),
        }
    }
}

/// A directed, typed edge between two placed blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    #[serde(rename = "fromBlockId")]
    pub from: BlockId,
    #[serde(rename = "toBlockId")]
    pub to: BlockId,
    pub kind: ConnectionKind,
}

impl Connection {
    pub fn new(from: BlockId, to: BlockId, kind: ConnectionKind) -> Self {
        Self { from, to, kind }
    }

    pub fn touches(&self, id: &str) -> bool {
        self.from.as_str() == id || self.to.as_str() == id
    }
}
