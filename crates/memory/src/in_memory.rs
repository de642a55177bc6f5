//! In-memory log — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use weft_core::error::LogError;
use weft_core::log::ConversationLog;
use weft_core::message::Message;

/// An in-memory log that stores messages in a Vec.
/// Useful for testing and sessions where persistence isn't needed.
pub struct InMemoryLog {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl InMemoryLog {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a log pre-populated with messages (handy in tests).
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages: Arc::new(RwLock::new(messages)),
        }
    }
}

impl Default for InMemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationLog for InMemoryLog {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn initialize(&self) -> Result<(), LogError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), LogError> {
        Ok(())
    }

    async fn append(&self, message: Message) -> Result<(), LogError> {
        self.messages.write().await.push(message);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Message>, LogError> {
        Ok(self.messages.read().await.clone())
    }

    async fn replace_all(&self, messages: Vec<Message>) -> Result<(), LogError> {
        *self.messages.write().await = messages;
        Ok(())
    }

    async fn clear(&self) -> Result<(), LogError> {
        self.messages.write().await.clear();
        Ok(())
    }
}
