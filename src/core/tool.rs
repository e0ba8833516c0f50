use serde::{Deserialize, Serialize};

/// MCP-compatible tool descriptor.
/// Serializes 1:1 with the entries of a `tools/list` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}
