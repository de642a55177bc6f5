//! Tool provider trait — the abstraction over externally hosted capabilities.
//!
//! A `ToolProvider` is a session with some external tool surface (a
//! subprocess, an IPC channel, an HTTP endpoint). One provider offers many
//! tools; the executor in `weft-tools` dispatches calls to the first
//! registered provider that offers the requested name.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::ToolError;

/// A tool definition sent to the model so it knows what it can call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// The core ToolProvider trait.
///
/// Implementations own the transport to wherever the tools actually live.
/// Failures are returned as `ToolError` and converted into tool-message
/// content at the executor boundary — they never reach the agent loop as
/// faults.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// A human-readable name for this provider (used in logs).
    fn name(&self) -> &str;

    /// List the tools this provider offers.
    async fn list_tools(&self) -> std::result::Result<Vec<ToolDefinition>, ToolError>;

    /// Invoke a tool by name with already-parsed JSON arguments.
    ///
    /// Returns the tool's output as plain text.
    async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<String, ToolError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_definition_serialization() {
        let tool = ToolDefinition {
            name: "search".into(),
            description: "Search the web".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "The search query" }
                },
                "required": ["query"]
            }),
        };
        let json = serde_json::to_string(&tool).unwrap();
        assert!(json.contains("search"));
        assert!(json.contains("query"));
    }

    #[test]
    fn tool_definition_roundtrip() {
        let tool = ToolDefinition {
            name: "read_file".into(),
            description: "Read a file".into(),
            parameters: serde_json::json!({"type": "object"}),
        };
        let json = serde_json::to_string(&tool).unwrap();
        let back: ToolDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tool);
    }
}
