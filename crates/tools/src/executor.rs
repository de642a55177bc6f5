//! Tool executor — ordered provider registry and the never-throw call boundary.
//!
//! Providers are registered in order; each registration lists the tools the
//! provider offers. A name already offered by an earlier registration is
//! skipped, so dispatch is deterministic: first registered wins.
//!
//! `call` never raises past this boundary. Unknown tools, unparsable
//! arguments, and provider failures all come back as a tool message whose
//! content describes the problem, letting the model see the failure and
//! adapt.

use std::sync::Arc;
use tracing::{debug, warn};
use weft_core::error::ToolError;
use weft_core::message::{Message, ToolCall};
use weft_core::tool::{ToolDefinition, ToolProvider};

struct RegisteredProvider {
    provider: Arc<dyn ToolProvider>,
    definitions: Vec<ToolDefinition>,
}

/// An ordered registry of tool providers.
///
/// The agent loop uses this to:
/// 1. Get tool definitions to send to the model
/// 2. Dispatch tool calls to the provider that offers each name
pub struct ToolExecutor {
    providers: Vec<RegisteredProvider>,
}

impl ToolExecutor {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Register a provider, recording which of its tools it will serve.
    ///
    /// Tools whose name is already offered — by an earlier provider or
    /// earlier in this provider's own listing — are skipped.
    pub async fn register(&mut self, provider: Arc<dyn ToolProvider>) -> Result<(), ToolError> {
        let listed = provider.list_tools().await?;

        let mut accepted = Vec::new();
        for definition in listed {
            if self.offers(&definition.name) || accepted.iter().any(|d: &ToolDefinition| d.name == definition.name) {
                warn!(
                    provider = provider.name(),
                    tool = %definition.name,
                    "Skipping duplicate tool registration"
                );
                continue;
            }
            accepted.push(definition);
        }

        debug!(
            provider = provider.name(),
            tools = accepted.len(),
            "Registered tool provider"
        );
        self.providers.push(RegisteredProvider {
            provider,
            definitions: accepted,
        });
        Ok(())
    }

    /// Whether any registered provider offers this tool name.
    pub fn offers(&self, name: &str) -> bool {
        self.providers
            .iter()
            .any(|r| r.definitions.iter().any(|d| d.name == name))
    }

    /// All tool definitions, flattened in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.providers
            .iter()
            .flat_map(|r| r.definitions.iter().cloned())
            .collect()
    }

    /// Execute a tool call and return its result as a tool message.
    ///
    /// The returned message always echoes the call's id; failure is encoded
    /// in the content, never raised.
    pub async fn call(&self, call: &ToolCall) -> Message {
        let Some(registered) = self
            .providers
            .iter()
            .find(|r| r.definitions.iter().any(|d| d.name == call.name))
        else {
            warn!(tool = %call.name, "Tool not found");
            return Message::tool(&call.id, format!("Tool '{}' not found.", call.name));
        };

        let arguments: serde_json::Value = match serde_json::from_str(&call.arguments) {
            Ok(value) => value,
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Unparsable tool arguments");
                return Message::tool(
                    &call.id,
                    format!("Error parsing arguments for tool '{}': {e}", call.name),
                );
            }
        };

        debug!(tool = %call.name, provider = registered.provider.name(), "Executing tool call");
        match registered.provider.call_tool(&call.name, arguments).await {
            Ok(content) => Message::tool(&call.id, content),
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                Message::tool(
                    &call.id,
                    format!("Error executing tool '{}': {e}", call.name),
                )
            }
        }
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}
