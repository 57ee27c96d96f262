use crate::error::PayloadError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a block, resolved once when its template is authored or decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockCategory {
    Start,
    Agent,
    Output,
    Tool,
}

const OUTPUT_KEYWORDS: [&str; 8] = [
    "email", "output", "report", "database", "ticket", "send", "create", "update",
];
const AGENT_KEYWORDS: [&str; 2] = ["agent", "ai"];

impl BlockCategory {
    /// Parses a palette category string (`"agents"`, `"output"`, ...).
    pub fn parse(category: &str) -> Option<Self> {
        match category.trim().to_ascii_lowercase().as_str() {
            "start" => Some(Self::Start),
            "agent" | "agents" => Some(Self::Agent),
            "output" | "outputs" => Some(Self::Output),
            "tool" | "tools" => Some(Self::Tool),
            _ => None,
        }
    }

    /// Keyword classification of a free-form title.
    ///
    /// Output keywords win over agent keywords, which win over `start`;
    /// anything unrecognised is a start block.
    pub fn classify_title(title: &str) -> Self {
        let title = title.to_lowercase();
        if OUTPUT_KEYWORDS.iter().any(|k| title.contains(k)) {
            Self::Output
        } else if title.contains("tool") {
            Self::Tool
        } else if AGENT_KEYWORDS.iter().any(|k| title.contains(k)) {
            Self::Agent
        } else {
            Self::Start
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Agent => "agent",
            Self::Output => "output",
            Self::Tool => "tool",
        }
    }
}

impl fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A palette entry. Also the payload carried from the palette to the canvas on drop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTemplate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub category: BlockCategory,
    /// Tool blocks that may drive other blocks the way agents do.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub agent_like: bool,
}

// Wire shape of a drag payload. Category stays a string so palettes that
// use "agents" or omit the field still decode.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTemplate {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    color: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    agent_like: bool,
}

impl BlockTemplate {
    pub fn new(
        id: &str,
        title: &str,
        description: &str,
        icon: &str,
        color: &str,
        category: BlockCategory,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            category,
            agent_like: false,
        }
    }

    pub fn agent_like(mut self) -> Self {
        self.agent_like = true;
        self
    }

    /// Decodes a drag payload.
    pub fn from_payload(payload: &str) -> Result<Self, PayloadError> {
        let raw: RawTemplate =
            serde_json::from_str(payload).map_err(|e| PayloadError::Malformed(e.to_string()))?;
        if raw.id.trim().is_empty() {
            return Err(PayloadError::MissingId);
        }
        let category = raw
            .category
            .as_deref()
            .and_then(BlockCategory::parse)
            .unwrap_or_else(|| BlockCategory::classify_title(&raw.title));

        Ok(Self {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            icon: raw.icon,
            color: raw.color,
            category,
            agent_like: raw.agent_like,
        })
    }

    /// Encodes the template as the payload the palette attaches to a drag.
    pub fn to_payload(&self) -> String {
        // Plain strings, a unit enum and a bool cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }
}
