//! ModelClient trait — the abstraction over streaming LLM backends.
//!
//! A `ModelClient` knows how to send a conversation to a language model and
//! get the response back as a finite stream of `Token`s. The agent loop
//! consumes the stream token by token; log compaction uses the collected
//! mode, which folds the stream into a single text string.

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use crate::error::ModelError;
use crate::message::Message;
use crate::token::Token;
use crate::tool::ToolDefinition;

/// A finite stream of response tokens, terminated when the provider closes
/// the underlying stream.
pub type TokenStream = Pin<Box<dyn Stream<Item = std::result::Result<Token, ModelError>> + Send>>;

/// The core ModelClient trait.
///
/// Every model backend implements `create_chat_stream`; `create_chat` is a
/// provided adapter that drains the stream and concatenates its `Text`
/// tokens.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// A human-readable name for this client (e.g., "openai", "anthropic").
    fn name(&self) -> &str;

    /// Start a streaming chat over the given conversation.
    ///
    /// `tool_definitions` describes what the model may call; pass an empty
    /// slice to forbid tool use for this request.
    async fn create_chat_stream(
        &self,
        messages: Vec<Message>,
        tool_definitions: Vec<ToolDefinition>,
    ) -> std::result::Result<TokenStream, ModelError>;

    /// Collected (non-streaming) mode: run a chat to completion and return
    /// the concatenated text content, discarding tool-call fragments.
    async fn create_chat(
        &self,
        messages: Vec<Message>,
        tool_definitions: Vec<ToolDefinition>,
    ) -> std::result::Result<String, ModelError> {
        let mut stream = self.create_chat_stream(messages, tool_definitions).await?;
        let mut content = String::new();
        while let Some(token) = stream.next().await {
            if let Token::Text { text } = token? {
                content.push_str(&text);
            }
        }
        Ok(content)
    }
}
