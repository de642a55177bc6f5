//! File-based log — one persisted JSON document per conversation.
//!
//! The persisted shape is `{ "messages": [ <message>, ... ] }` where each
//! message carries its tagged `role`. Messages are loaded into memory on
//! `initialize` and the whole document is rewritten on every mutation —
//! fast reads with durable writes.
//!
//! A malformed document is a fatal load error. The log is the source of
//! truth for resuming a conversation; silently dropping part of it would
//! change the derived pending-call set.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use weft_core::error::LogError;
use weft_core::log::ConversationLog;
use weft_core::message::Message;

#[derive(Deserialize)]
struct LogDocument {
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct LogDocumentRef<'a> {
    messages: &'a [Message],
}

/// A file-backed log storing the conversation as a single JSON document.
pub struct JsonFileLog {
    path: PathBuf,
    messages: Arc<RwLock<Vec<Message>>>,
}

impl JsonFileLog {
    /// Create a log backed by the given path.
    ///
    /// Nothing is read until `initialize`; the file is created on first
    /// write if it does not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            messages: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// The path this log persists to.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn load_from_disk(&self) -> Result<Vec<Message>, LogError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            // File doesn't exist yet — start empty
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(LogError::Storage(format!(
                    "Failed to read log file {}: {e}",
                    self.path.display()
                )))
            }
        };

        let document: LogDocument =
            serde_json::from_str(&content).map_err(|e| LogError::Corrupt {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(document.messages)
    }

    /// Rewrite the whole document. Called with the lock already released;
    /// takes its own read snapshot.
    async fn flush(&self) -> Result<(), LogError> {
        let messages = self.messages.read().await;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                LogError::Storage(format!("Failed to create log directory: {e}"))
            })?;
        }

        let content = serde_json::to_string_pretty(&LogDocumentRef {
            messages: &messages,
        })
        .map_err(|e| LogError::Storage(format!("Failed to serialize log: {e}")))?;

        std::fs::write(&self.path, content).map_err(|e| {
            LogError::Storage(format!(
                "Failed to write log file {}: {e}",
                self.path.display()
            ))
        })?;

        Ok(())
    }
}

#[async_trait]
impl ConversationLog for JsonFileLog {
    fn name(&self) -> &str {
        "json_file"
    }

    async fn initialize(&self) -> Result<(), LogError> {
        let loaded = self.load_from_disk()?;
        debug!(path = %self.path.display(), count = loaded.len(), "Conversation log loaded");
        *self.messages.write().await = loaded;
        Ok(())
    }

    async fn close(&self) -> Result<(), LogError> {
        self.flush().await
    }

    async fn append(&self, message: Message) -> Result<(), LogError> {
        self.messages.write().await.push(message);
        self.flush().await
    }

    async fn all(&self) -> Result<Vec<Message>, LogError> {
        Ok(self.messages.read().await.clone())
    }

    async fn replace_all(&self, messages: Vec<Message>) -> Result<(), LogError> {
        *self.messages.write().await = messages;
        self.flush().await
    }

    async fn clear(&self) -> Result<(), LogError> {
        self.messages.write().await.clear();
        self.flush().await
    }
}
