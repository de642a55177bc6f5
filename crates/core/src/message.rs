//! Message domain types.
//!
//! These are the core value objects that flow through the entire system:
//! the user submits a message → the agent loop streams a model response →
//! tool results come back → everything lands in the conversation log.
//!
//! Messages are immutable once appended to the log. The tagged `role` field
//! is also the persisted wire shape: `{"role":"user","content":...}`.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The language model
    Assistant,
    /// Tool execution result
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
            Self::Tool => write!(f, "tool"),
        }
    }
}

/// A single message in a conversation.
///
/// Each variant carries exactly the fields its role persists — no optional
/// `tool_call_id` on user messages, no `tool_calls` on tool results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// A message typed by the end user.
    User { content: String },

    /// A model response, possibly requesting tool invocations.
    Assistant {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },

    /// The result of one tool invocation, answering a prior tool call.
    Tool { content: String, call_id: String },
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_calls,
        }
    }

    /// Create a tool result message answering `call_id`.
    pub fn tool(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Tool {
            content: content.into(),
            call_id: call_id.into(),
        }
    }

    /// The role of this message.
    pub fn role(&self) -> Role {
        match self {
            Self::User { .. } => Role::User,
            Self::Assistant { .. } => Role::Assistant,
            Self::Tool { .. } => Role::Tool,
        }
    }

    /// The text content of this message.
    pub fn content(&self) -> &str {
        match self {
            Self::User { content } => content,
            Self::Assistant { content, .. } => content,
            Self::Tool { content, .. } => content,
        }
    }

    /// Tool calls carried by this message (empty unless assistant).
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Self::Assistant { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }
}

/// A tool call embedded in an assistant message.
///
/// Identity is `id`; ids are minted by the model and must be unique within
/// a conversation for pending-call derivation to be correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique ID for this tool call
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Arguments as a JSON-encoded string
    pub arguments: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("Hello, agent!");
        assert_eq!(msg.role(), Role::User);
        assert_eq!(msg.content(), "Hello, agent!");
        assert!(msg.tool_calls().is_empty());
    }

    #[test]
    fn assistant_message_carries_tool_calls() {
        let msg = Message::assistant(
            "",
            vec![ToolCall {
                id: "call_1".into(),
                name: "search".into(),
                arguments: "{}".into(),
            }],
        );
        assert_eq!(msg.role(), Role::Assistant);
        assert_eq!(msg.tool_calls().len(), 1);
        assert_eq!(msg.tool_calls()[0].name, "search");
    }

    #[test]
    fn tool_message_echoes_call_id() {
        let msg = Message::tool("call_1", "42");
        match &msg {
            Message::Tool { call_id, content } => {
                assert_eq!(call_id, "call_1");
                assert_eq!(content, "42");
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn message_serializes_with_role_tag() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert!(json.contains(r#""role":"user""#));

        let json = serde_json::to_string(&Message::tool("call_1", "ok")).unwrap();
        assert!(json.contains(r#""role":"tool""#));
        assert!(json.contains(r#""call_id":"call_1""#));
    }

    #[test]
    fn assistant_without_calls_omits_tool_calls_field() {
        let json = serde_json::to_string(&Message::assistant("hi", vec![])).unwrap();
        assert!(!json.contains("tool_calls"));
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = Message::assistant(
            "thinking",
            vec![ToolCall {
                id: "a".into(),
                name: "search".into(),
                arguments: r#"{"query":"rust"}"#.into(),
            }],
        );
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, msg);
    }

    #[test]
    fn deserializes_assistant_missing_tool_calls() {
        let msg: Message =
            serde_json::from_str(r#"{"role":"assistant","content":"hi"}"#).unwrap();
        assert_eq!(msg, Message::assistant("hi", vec![]));
    }
}
