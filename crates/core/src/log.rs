//! ConversationLog trait — the durable, append-only message log.
//!
//! The log is the single source of truth for a conversation. There is no
//! separate queue of work: "which tool calls still need an answer" is
//! derived by replaying the log (`replay::pending_calls`), which makes
//! crash recovery trivial — reload the log and the same pending set falls
//! out.
//!
//! Implementations live in `weft-memory`. Behavior is composed by
//! delegation: the summarizing backend wraps an inner log rather than
//! subclassing one.

use async_trait::async_trait;
use crate::error::LogError;
use crate::message::{Message, Role, ToolCall};

/// The core ConversationLog trait.
///
/// `append` and `replace_all` are the only mutation points; `replace_all`
/// exists solely for compaction and must be atomic with respect to
/// concurrent readers. Snapshots returned by `all` are never retroactively
/// changed by later mutations.
#[async_trait]
pub trait ConversationLog: Send + Sync {
    /// The backend name (e.g., "in_memory", "json_file", "summarizing").
    fn name(&self) -> &str;

    /// Load persisted state. A malformed persisted document is a fatal
    /// error, not a silent reset.
    async fn initialize(&self) -> std::result::Result<(), LogError>;

    /// Flush and release. The log must not be used afterwards.
    async fn close(&self) -> std::result::Result<(), LogError>;

    /// Append one message, durably. When this returns, a crash must not
    /// lose the message; a crash during the call may.
    async fn append(&self, message: Message) -> std::result::Result<(), LogError>;

    /// A read-only snapshot of the full ordered sequence.
    async fn all(&self) -> std::result::Result<Vec<Message>, LogError>;

    /// Bulk-replace the entire log. Used only by compaction.
    async fn replace_all(&self, messages: Vec<Message>) -> std::result::Result<(), LogError>;

    /// Remove all messages and persist the empty state.
    async fn clear(&self) -> std::result::Result<(), LogError>;

    /// Number of messages in the log.
    async fn len(&self) -> std::result::Result<usize, LogError> {
        Ok(self.all().await?.len())
    }

    /// Tool calls that have appeared in an assistant message but have no
    /// matching tool result yet, in first-seen order. Derived purely from
    /// the log contents — see [`replay::pending_calls`].
    async fn pending_tool_calls(&self) -> std::result::Result<Vec<ToolCall>, LogError> {
        Ok(replay::pending_calls(&self.all().await?))
    }

    /// All messages with the given role, in log order.
    async fn filter_by_role(&self, role: Role) -> std::result::Result<Vec<Message>, LogError> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .filter(|m| m.role() == role)
            .collect())
    }

    /// The newest `limit` messages, in log order.
    async fn history(&self, limit: usize) -> std::result::Result<Vec<Message>, LogError> {
        let messages = self.all().await?;
        let skip = messages.len().saturating_sub(limit);
        Ok(messages.into_iter().skip(skip).collect())
    }
}

/// Pure replay over a message sequence.
pub mod replay {
    use std::collections::HashMap;
    use tracing::debug;
    use crate::message::{Message, ToolCall};

    /// Derive the pending tool calls from an ordered message sequence.
    ///
    /// Scan in order, keeping a map from call id to either "answered" or
    /// the live call:
    /// - a tool message marks its `call_id` answered, overwriting any
    ///   pending entry (an orphan result with no earlier call is harmless);
    /// - an assistant message inserts each contained call only if its id is
    ///   not yet present — first writer wins, and an id already answered is
    ///   not resurrected by a later reuse.
    ///
    /// The result preserves first-seen order. Calling this twice over the
    /// same sequence yields the same result; appending a tool message for
    /// every pending id empties it.
    pub fn pending_calls(messages: &[Message]) -> Vec<ToolCall> {
        let mut slots: HashMap<String, Option<ToolCall>> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for message in messages {
            match message {
                Message::Tool { call_id, .. } => {
                    slots.insert(call_id.clone(), None);
                }
                Message::Assistant { tool_calls, .. } => {
                    for call in tool_calls {
                        if !slots.contains_key(&call.id) {
                            slots.insert(call.id.clone(), Some(call.clone()));
                            order.push(call.id.clone());
                        }
                    }
                }
                Message::User { .. } => {}
            }
        }

        let pending: Vec<ToolCall> = order
            .into_iter()
            .filter_map(|id| slots.remove(&id).flatten())
            .collect();

        debug!(count = pending.len(), "Derived pending tool calls");
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::replay::pending_calls;
    use crate::message::{Message, ToolCall};

    fn call(id: &str, name: &str) -> ToolCall {
        ToolCall {
            id: id.into(),
            name: name.into(),
            arguments: "{}".into(),
        }
    }

    #[test]
    fn empty_log_has_no_pending_calls() {
        assert!(pending_calls(&[]).is_empty());
    }

    #[test]
    fn unanswered_calls_are_pending_in_first_seen_order() {
        let log = vec![
            Message::user("hi"),
            Message::assistant("", vec![call("1", "search"), call("2", "read")]),
            Message::assistant("", vec![call("3", "write")]),
        ];
        let pending = pending_calls(&log);
        let ids: Vec<&str> = pending.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn answered_calls_are_removed() {
        let log = vec![
            Message::assistant("", vec![call("1", "search"), call("2", "read")]),
            Message::tool("1", "result"),
        ];
        let pending = pending_calls(&log);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "2");
    }

    #[test]
    fn answering_every_call_empties_pending() {
        let mut log = vec![
            Message::assistant("", vec![call("1", "search"), call("2", "read")]),
        ];
        for pending in pending_calls(&log) {
            log.push(Message::tool(pending.id.clone(), "done"));
        }
        assert!(pending_calls(&log).is_empty());
    }

    #[test]
    fn answered_id_is_not_resurrected_by_later_reuse() {
        let log = vec![
            Message::assistant("", vec![call("1", "search")]),
            Message::tool("1", "result"),
            Message::assistant("", vec![call("1", "search")]),
        ];
        assert!(pending_calls(&log).is_empty());
    }

    #[test]
    fn duplicate_id_first_writer_wins() {
        let log = vec![
            Message::assistant("", vec![call("1", "search")]),
            Message::assistant("", vec![ToolCall {
                id: "1".into(),
                name: "other".into(),
                arguments: r#"{"x":1}"#.into(),
            }]),
        ];
        let pending = pending_calls(&log);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "search");
    }

    #[test]
    fn orphan_tool_message_does_not_crash_replay() {
        let log = vec![
            Message::tool("ghost", "late result"),
            Message::assistant("", vec![call("1", "search")]),
        ];
        let pending = pending_calls(&log);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "1");
    }

    #[test]
    fn replay_is_idempotent() {
        let log = vec![
            Message::assistant("", vec![call("1", "search"), call("2", "read")]),
            Message::tool("2", "result"),
        ];
        assert_eq!(pending_calls(&log), pending_calls(&log));
    }
}
