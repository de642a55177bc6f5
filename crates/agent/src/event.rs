//! Agent-level streaming events.
//!
//! `AgentEvent` is what the orchestrator emits to its caller: every model
//! token re-emitted live, interleaved with fully assembled messages at
//! phase boundaries (the assistant message once its stream completes, each
//! tool message as it finishes). Consumers distinguish by the tagged
//! variant.

use serde::{Deserialize, Serialize};
use weft_core::message::Message;
use weft_core::token::Token;

/// Events emitted by the orchestrator during a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// One streamed model token, forwarded as it arrives.
    Token { token: Token },

    /// A fully assembled message, emitted right after it lands in the log.
    Message { message: Message },
}

impl AgentEvent {
    /// Wire name for this event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Token { .. } => "token",
            Self::Message { .. } => "message",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serialization_token() {
        let event = AgentEvent::Token {
            token: Token::Text { text: "Hello".into() },
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"token""#));
        assert!(json.contains(r#""text":"Hello""#));
    }

    #[test]
    fn event_serialization_message() {
        let event = AgentEvent::Message {
            message: Message::tool("call_1", "42"),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"message""#));
        assert!(json.contains(r#""call_id":"call_1""#));
    }

    #[test]
    fn event_type_names() {
        assert_eq!(
            AgentEvent::Token {
                token: Token::Text { text: "x".into() }
            }
            .event_type(),
            "token"
        );
        assert_eq!(
            AgentEvent::Message {
                message: Message::user("x")
            }
            .event_type(),
            "message"
        );
    }

    #[test]
    fn event_deserialization() {
        let json = r#"{"type":"token","token":{"type":"chat_id","id":"c1"}}"#;
        let event: AgentEvent = serde_json::from_str(json).unwrap();
        match event {
            AgentEvent::Token { token: Token::ChatId { id } } => assert_eq!(id, "c1"),
            _ => panic!("Wrong variant"),
        }
    }
}
