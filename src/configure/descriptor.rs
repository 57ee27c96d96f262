use super::values::FormValues;
use crate::canvas::BlockId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const RETRIEVAL_NODE_ID: &str = "get_code_documentation";
const RETRIEVAL_URL: &str = "https://raw.githubusercontent.com/facebook/react/main/README.md";
const AGENT_MODEL: &str = "gemini-2.0-flash";

/// The document an agent block hands to the code-deploy service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentDescriptor {
    #[serde(rename = "NodeConfiguration")]
    pub node_configuration: Vec<NodeConfiguration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeConfiguration {
    Retrieval(RetrievalNode),
    Agent(AgentNode),
}

/// Fetches the material the agent works on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalNode {
    #[serde(rename = "type")]
    pub method: String,
    pub workflow_id: String,
    pub node_id: String,
    pub description: String,
    pub url: String,
    pub auth_token: String,
    pub parameters: Vec<String>,
    pub search_params: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentNode {
    #[serde(rename = "type")]
    pub node_type: String,
    pub workflow_id: String,
    pub node_id: String,
    pub system_prompt: String,
    pub description: String,
    pub model: String,
    pub api_key: String,
    pub prompt: String,
    pub function_list: Vec<String>,
}

impl DeploymentDescriptor {
    /// Builds the descriptor for an agent block from its form values.
    ///
    /// Pure: the same values and block id always give the same document.
    /// The retrieval description is closed with `"""` whether or not the
    /// form supplies one.
    pub fn for_agent(values: &FormValues, block_id: &BlockId) -> Self {
        let workflow_id = format!("wf_{}", block_id.short());

        let retrieval = RetrievalNode {
            method: "GET".to_string(),
            workflow_id: workflow_id.clone(),
            node_id: RETRIEVAL_NODE_ID.to_string(),
            description: format!(
                "\"\"\"Data retrieval for {}\"\"\"",
                values.get_or("description", "public code documentation")
            ),
            url: RETRIEVAL_URL.to_string(),
            auth_token: String::new(),
            parameters: Vec::new(),
            search_params: BTreeMap::new(),
        };

        let agent = AgentNode {
            node_type: values.get_or("nodeType", "DecisionText").to_string(),
            workflow_id,
            node_id: values.get_or("nodeId", "scraper").to_string(),
            system_prompt: values
                .get_or("systemPrompt", "You are a Senior Software Engineer.")
                .to_string(),
            description: values
                .get_or(
                    "description",
                    "\"\"\"Analyze raw github code documentation\"\"\"",
                )
                .to_string(),
            model: AGENT_MODEL.to_string(),
            api_key: values.get_or("apiKey", "apiKey").to_string(),
            prompt: values
                .get_or(
                    "prompt",
                    "Analyze public code documentation and return a report of it.",
                )
                .to_string(),
            function_list: vec![
                RETRIEVAL_NODE_ID.to_string(),
                "retrieve_memories".to_string(),
            ],
        };

        Self {
            node_configuration: vec![
                NodeConfiguration::Retrieval(retrieval),
                NodeConfiguration::Agent(agent),
            ],
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Compact JSON text. Field order is fixed, so equal descriptors give equal bytes.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Repository path the generated service code is committed to.
pub fn deploy_path(values: &FormValues, block_id: Option<&BlockId>) -> String {
    let node_id = values
        .get("nodeId")
        .or(block_id.map(|id| id.as_str()))
        .unwrap_or("agent");
    format!("service/{}.py", node_id)
}
