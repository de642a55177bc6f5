//! Streamed response tokens.
//!
//! A `Token` is one fragment of a streaming model response. Plain text
//! arrives as `Text`; a tool call under construction arrives as separate
//! id/name/arguments fragments that share a stream `index`. Fragments for
//! the same field concatenate in arrival order — there is no upper bound
//! on how many chunks a single field is split across.

use serde::{Deserialize, Serialize};

/// One fragment of a streamed model response.
///
/// At most one `ChatId` is ever emitted per stream, always first if present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Token {
    /// Partial text content.
    Text { text: String },

    /// Fragment of a tool call's id.
    ToolCallId { index: u32, id: String },

    /// Fragment of a tool call's name.
    ToolCallName { index: u32, name: String },

    /// Fragment of a tool call's JSON-encoded arguments.
    ToolCallArguments { index: u32, arguments: String },

    /// The provider-assigned chat id for this exchange.
    ChatId { id: String },
}

impl Token {
    /// Wire name for this token kind.
    pub fn token_type(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::ToolCallId { .. } => "tool_call_id",
            Self::ToolCallName { .. } => "tool_call_name",
            Self::ToolCallArguments { .. } => "tool_call_arguments",
            Self::ChatId { .. } => "chat_id",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_serialization_text() {
        let token = Token::Text { text: "Hello".into() };
        let json = serde_json::to_string(&token).unwrap();
        assert!(json.contains(r#""type":"text""#));
        assert!(json.contains(r#""text":"Hello""#));
    }

    #[test]
    fn token_serialization_tool_call_fragment() {
        let token = Token::ToolCallArguments {
            index: 2,
            arguments: r#"{"qu"#.into(),
        };
        let json = serde_json::to_string(&token).unwrap();
        assert!(json.contains(r#""type":"tool_call_arguments""#));
        assert!(json.contains(r#""index":2"#));
    }

    #[test]
    fn token_type_names() {
        assert_eq!(Token::Text { text: "x".into() }.token_type(), "text");
        assert_eq!(
            Token::ToolCallId { index: 0, id: "a".into() }.token_type(),
            "tool_call_id"
        );
        assert_eq!(
            Token::ToolCallName { index: 0, name: "b".into() }.token_type(),
            "tool_call_name"
        );
        assert_eq!(
            Token::ToolCallArguments { index: 0, arguments: "{}".into() }.token_type(),
            "tool_call_arguments"
        );
        assert_eq!(Token::ChatId { id: "c".into() }.token_type(), "chat_id");
    }

    #[test]
    fn token_deserialization() {
        let json = r#"{"type":"tool_call_name","index":1,"name":"sea"}"#;
        let token: Token = serde_json::from_str(json).unwrap();
        match token {
            Token::ToolCallName { index, name } => {
                assert_eq!(index, 1);
                assert_eq!(name, "sea");
            }
            _ => panic!("Wrong variant"),
        }
    }
}
