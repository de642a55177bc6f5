//! Summarizing log — keeps an inner log bounded by model-generated summaries.
//!
//! A decorator over any `ConversationLog`: every operation delegates to the
//! inner log, and after each append the length is checked against the
//! compaction policy. When the log overflows, the oldest messages are sent
//! to the model for summarization and replaced with a single synthetic
//! assistant message, leaving `retained_window_size + 1` messages behind.
//!
//! The bulk replacement happens through one `replace_all` call, so a
//! concurrent reader never observes the prefix removed but the summary not
//! yet inserted.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use weft_core::error::LogError;
use weft_core::log::ConversationLog;
use weft_core::message::Message;
use weft_core::model::ModelClient;

/// Instruction appended to the overflowed prefix before summarization.
const SUMMARY_INSTRUCTION: &str = "Summarize the conversation above in a few short \
paragraphs. Keep decisions, established facts, and any unfinished work.";

/// When to compact and how much history to keep verbatim.
///
/// The two counts are independent tunables: `compaction_threshold` decides
/// when compaction triggers (`len > threshold`), `retained_window_size`
/// decides how many of the newest messages survive unsummarized.
#[derive(Debug, Clone, Copy)]
pub struct CompactionPolicy {
    compaction_threshold: usize,
    retained_window_size: usize,
}

impl CompactionPolicy {
    /// Create a policy. `retained_window_size` must be strictly smaller
    /// than `compaction_threshold`, otherwise compaction could never
    /// shrink the log.
    pub fn new(
        compaction_threshold: usize,
        retained_window_size: usize,
    ) -> Result<Self, LogError> {
        if compaction_threshold == 0 {
            return Err(LogError::InvalidPolicy(
                "compaction_threshold must be greater than zero".into(),
            ));
        }
        if retained_window_size >= compaction_threshold {
            return Err(LogError::InvalidPolicy(format!(
                "retained_window_size ({retained_window_size}) must be smaller than \
                 compaction_threshold ({compaction_threshold})"
            )));
        }
        Ok(Self {
            compaction_threshold,
            retained_window_size,
        })
    }

    pub fn compaction_threshold(&self) -> usize {
        self.compaction_threshold
    }

    pub fn retained_window_size(&self) -> usize {
        self.retained_window_size
    }
}

/// A log decorator that summarizes overflowed history.
///
/// Holds the inner log and the model as collaborators — composition by
/// delegation, no inheritance between backends.
pub struct SummarizingLog {
    inner: Arc<dyn ConversationLog>,
    model: Arc<dyn ModelClient>,
    policy: CompactionPolicy,
}

impl SummarizingLog {
    pub fn new(
        inner: Arc<dyn ConversationLog>,
        model: Arc<dyn ModelClient>,
        policy: CompactionPolicy,
    ) -> Self {
        Self {
            inner,
            model,
            policy,
        }
    }

    pub fn policy(&self) -> &CompactionPolicy {
        &self.policy
    }

    /// Compact if the log has outgrown the threshold; no-op otherwise.
    ///
    /// The overflowed prefix plus a summarization instruction is sent to
    /// the model with no tool definitions; the concatenated text of the
    /// response becomes one synthetic assistant message that replaces the
    /// prefix.
    pub async fn compact(&self) -> Result<(), LogError> {
        let messages = self.inner.all().await?;
        if messages.len() <= self.policy.compaction_threshold {
            debug!(
                len = messages.len(),
                threshold = self.policy.compaction_threshold,
                "Log within threshold, skipping compaction"
            );
            return Ok(());
        }

        let split = messages.len() - self.policy.retained_window_size;
        let mut overflow = messages[..split].to_vec();
        let retained = &messages[split..];

        overflow.push(Message::user(SUMMARY_INSTRUCTION));
        let summary = self
            .model
            .create_chat(overflow, Vec::new())
            .await
            .map_err(|e| LogError::Summarize(e.to_string()))?;

        let mut compacted = Vec::with_capacity(retained.len() + 1);
        compacted.push(Message::assistant(summary, Vec::new()));
        compacted.extend_from_slice(retained);

        info!(
            summarized = split,
            retained = retained.len(),
            "Compacted conversation log"
        );
        self.inner.replace_all(compacted).await
    }
}

#[async_trait]
impl ConversationLog for SummarizingLog {
    fn name(&self) -> &str {
        "summarizing"
    }

    async fn initialize(&self) -> Result<(), LogError> {
        self.inner.initialize().await
    }

    async fn close(&self) -> Result<(), LogError> {
        self.inner.close().await
    }

    async fn append(&self, message: Message) -> Result<(), LogError> {
        self.inner.append(message).await?;
        self.compact().await
    }

    async fn all(&self) -> Result<Vec<Message>, LogError> {
        self.inner.all().await
    }

    async fn replace_all(&self, messages: Vec<Message>) -> Result<(), LogError> {
        self.inner.replace_all(messages).await
    }

    async fn clear(&self) -> Result<(), LogError> {
        self.inner.clear().await
    }
}
