//! Token assembly — folding a fragmented stream into one assistant message.
//!
//! Tool calls arrive split across many tokens: the id, name, and arguments
//! of one call each come in an unbounded number of fragments, all tagged
//! with the same stream index. The assembler keeps a draft slot per index,
//! created lazily on first reference, and concatenates each incoming
//! fragment onto its field. Indices need not be contiguous or start at 0;
//! the finished message orders calls by index ascending.

use std::collections::BTreeMap;
use weft_core::message::{Message, ToolCall};
use weft_core::token::Token;

/// A tool call under construction, keyed by stream index.
#[derive(Debug, Default)]
struct ToolCallDraft {
    id: String,
    name: String,
    arguments: String,
}

/// Accumulates one model turn's worth of tokens.
///
/// Re-emitting tokens to the caller is the orchestrator's job; the
/// assembler only accumulates.
#[derive(Debug, Default)]
pub struct TokenAssembler {
    content: String,
    chat_id: Option<String>,
    drafts: BTreeMap<u32, ToolCallDraft>,
}

impl TokenAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one token into the accumulated state.
    pub fn push(&mut self, token: &Token) {
        match token {
            Token::Text { text } => self.content.push_str(text),
            Token::ToolCallId { index, id } => {
                self.drafts.entry(*index).or_default().id.push_str(id);
            }
            Token::ToolCallName { index, name } => {
                self.drafts.entry(*index).or_default().name.push_str(name);
            }
            Token::ToolCallArguments { index, arguments } => {
                self.drafts
                    .entry(*index)
                    .or_default()
                    .arguments
                    .push_str(arguments);
            }
            Token::ChatId { id } => {
                if self.chat_id.is_none() {
                    self.chat_id = Some(id.clone());
                }
            }
        }
    }

    /// The provider-assigned chat id, if one was streamed.
    pub fn chat_id(&self) -> Option<&str> {
        self.chat_id.as_deref()
    }

    /// Materialize the assembled assistant message.
    ///
    /// Returns `None` when the stream yielded neither text nor any
    /// tool-call fragment — that turn produced nothing to append.
    pub fn finish(self) -> Option<Message> {
        if self.content.is_empty() && self.drafts.is_empty() {
            return None;
        }
        let tool_calls = self
            .drafts
            .into_values()
            .map(|draft| ToolCall {
                id: draft.id,
                name: draft.name,
                arguments: draft.arguments,
            })
            .collect();
        Some(Message::assistant(self.content, tool_calls))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_concatenate_into_one_call() {
        let mut assembler = TokenAssembler::new();
        assembler.push(&Token::ToolCallId { index: 0, id: "a".into() });
        assembler.push(&Token::ToolCallName { index: 0, name: "se".into() });
        assembler.push(&Token::ToolCallName { index: 0, name: "arch".into() });
        assembler.push(&Token::ToolCallArguments { index: 0, arguments: "{}".into() });

        let message = assembler.finish().unwrap();
        assert_eq!(
            message.tool_calls(),
            &[ToolCall {
                id: "a".into(),
                name: "search".into(),
                arguments: "{}".into(),
            }]
        );
        assert_eq!(message.content(), "");
    }

    #[test]
    fn interleaved_indices_assemble_independently() {
        let mut assembler = TokenAssembler::new();
        assembler.push(&Token::ToolCallId { index: 1, id: "b".into() });
        assembler.push(&Token::ToolCallId { index: 0, id: "a".into() });
        assembler.push(&Token::ToolCallName { index: 1, name: "wri".into() });
        assembler.push(&Token::ToolCallName { index: 0, name: "read".into() });
        assembler.push(&Token::ToolCallName { index: 1, name: "te".into() });
        assembler.push(&Token::ToolCallArguments { index: 0, arguments: r#"{"x""#.into() });
        assembler.push(&Token::ToolCallArguments { index: 1, arguments: "{}".into() });
        assembler.push(&Token::ToolCallArguments { index: 0, arguments: ":1}".into() });

        let message = assembler.finish().unwrap();
        let calls = message.tool_calls();
        assert_eq!(calls.len(), 2);
        // Ordered by index ascending
        assert_eq!(calls[0].id, "a");
        assert_eq!(calls[0].name, "read");
        assert_eq!(calls[0].arguments, r#"{"x":1}"#);
        assert_eq!(calls[1].id, "b");
        assert_eq!(calls[1].name, "write");
    }

    #[test]
    fn non_contiguous_indices_order_ascending() {
        let mut assembler = TokenAssembler::new();
        assembler.push(&Token::ToolCallId { index: 7, id: "late".into() });
        assembler.push(&Token::ToolCallId { index: 2, id: "early".into() });

        let message = assembler.finish().unwrap();
        let ids: Vec<&str> = message.tool_calls().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn text_accumulates_in_arrival_order() {
        let mut assembler = TokenAssembler::new();
        assembler.push(&Token::Text { text: "Hel".into() });
        assembler.push(&Token::Text { text: "lo".into() });

        let message = assembler.finish().unwrap();
        assert_eq!(message.content(), "Hello");
        assert!(message.tool_calls().is_empty());
    }

    #[test]
    fn empty_stream_produces_no_message() {
        assert!(TokenAssembler::new().finish().is_none());
    }

    #[test]
    fn chat_id_alone_produces_no_message() {
        let mut assembler = TokenAssembler::new();
        assembler.push(&Token::ChatId { id: "chat_1".into() });
        assert_eq!(assembler.chat_id(), Some("chat_1"));
        assert!(assembler.finish().is_none());
    }
}
