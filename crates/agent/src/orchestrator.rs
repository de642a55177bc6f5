//! The orchestration state machine.
//!
//! Each turn alternates between two phases driven by two dirty flags:
//!
//! 1. **Model phase** (`model_dirty`) — stream a chat over the full log,
//!    re-emit every token, and append the assembled assistant message.
//! 2. **Tool phase** (`context_dirty`) — execute each pending tool call in
//!    order, appending and emitting each result.
//!
//! The loop ends when a model phase produces no tool calls. The log is the
//! single source of truth: the pending set is derived by replay, never
//! queued separately, so a restart mid-turn resumes exactly where the
//! previous process stopped — tool calls already answered in the log put
//! the loop straight into the model phase.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};
use weft_core::error::Error;
use weft_core::log::ConversationLog;
use weft_core::message::{Message, ToolCall};
use weft_core::model::ModelClient;
use weft_tools::ToolExecutor;

use crate::assembler::TokenAssembler;
use crate::event::AgentEvent;
use futures::StreamExt;

/// Default bound for the emitted event channel.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// The orchestrator coordinating the model, the tool executor, and the
/// conversation log.
pub struct Orchestrator {
    /// The streaming model client
    model: Arc<dyn ModelClient>,

    /// Tool registry and execution boundary
    executor: Arc<ToolExecutor>,

    /// The durable conversation log — single source of truth
    log: Arc<dyn ConversationLog>,

    /// Capacity of the emitted event channel
    channel_capacity: usize,
}

impl Orchestrator {
    /// Create a new orchestrator.
    pub fn new(
        model: Arc<dyn ModelClient>,
        executor: Arc<ToolExecutor>,
        log: Arc<dyn ConversationLog>,
    ) -> Self {
        Self {
            model,
            executor,
            log,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Set the emitted event channel capacity.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Load the log's persisted state. Must be called before the first
    /// turn; a malformed persisted log fails here.
    pub async fn initialize(&self) -> Result<(), Error> {
        self.log.initialize().await?;
        Ok(())
    }

    /// Flush and release the log.
    pub async fn close(&self) -> Result<(), Error> {
        self.log.close().await?;
        Ok(())
    }

    /// Append a user message to the log.
    pub async fn submit(&self, content: impl Into<String>) -> Result<(), Error> {
        self.log.append(Message::user(content)).await?;
        Ok(())
    }

    /// Run one turn of the agent loop, returning the emitted event stream.
    ///
    /// The turn runs on its own task; dropping the returned stream cancels
    /// it. Cancelling mid-model-phase abandons that phase's in-flight
    /// assistant message — it is never appended, so nothing partial lands
    /// in the log. Fatal faults (model transport failure, log failure)
    /// arrive as the final `Err` item.
    pub fn next_stream(&self) -> ReceiverStream<Result<AgentEvent, Error>> {
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let model = Arc::clone(&self.model);
        let executor = Arc::clone(&self.executor);
        let log = Arc::clone(&self.log);

        tokio::spawn(async move {
            if let Err(e) = drive(model, executor, log, &tx).await {
                warn!(error = %e, "Turn aborted");
                let _ = tx.send(Err(e)).await;
            }
        });

        ReceiverStream::new(rx)
    }
}

/// Emit one event, reporting whether the receiver is still listening.
async fn emit(tx: &mpsc::Sender<Result<AgentEvent, Error>>, event: AgentEvent) -> bool {
    tx.send(Ok(event)).await.is_ok()
}

/// The two-flag loop. Returns `Ok` both on natural termination and when
/// the caller stopped listening (an abandoned turn is not a fault).
async fn drive(
    model: Arc<dyn ModelClient>,
    executor: Arc<ToolExecutor>,
    log: Arc<dyn ConversationLog>,
    tx: &mpsc::Sender<Result<AgentEvent, Error>>,
) -> Result<(), Error> {
    // Tool calls already recorded but unanswered decide the entry phase:
    // none means the model runs first, otherwise the tools do.
    let initial = log.pending_tool_calls().await?;
    let mut model_dirty = initial.is_empty();
    let mut context_dirty = !initial.is_empty();
    let mut pending: Option<Vec<ToolCall>> = if initial.is_empty() {
        None
    } else {
        Some(initial)
    };

    info!(
        model_dirty,
        context_dirty,
        "Starting turn"
    );

    while model_dirty || context_dirty {
        if model_dirty {
            let messages = log.all().await?;
            let definitions = executor.definitions();
            debug!(
                messages = messages.len(),
                tools = definitions.len(),
                "Model phase"
            );

            let mut stream = model.create_chat_stream(messages, definitions).await?;
            let mut assembler = TokenAssembler::new();

            while let Some(token) = stream.next().await {
                let token = token?;
                assembler.push(&token);
                if !emit(tx, AgentEvent::Token { token }).await {
                    return Ok(());
                }
            }

            let mut produced_calls = false;
            if let Some(message) = assembler.finish() {
                produced_calls = !message.tool_calls().is_empty();
                log.append(message.clone()).await?;
                if !emit(tx, AgentEvent::Message { message }).await {
                    return Ok(());
                }
            }

            model_dirty = false;
            context_dirty = produced_calls;
        }

        if context_dirty {
            let batch = match pending.take() {
                Some(batch) => batch,
                None => log.pending_tool_calls().await?,
            };
            debug!(calls = batch.len(), "Tool phase");

            for call in &batch {
                let message = executor.call(call).await;
                log.append(message.clone()).await?;
                if !emit(tx, AgentEvent::Message { message }).await {
                    return Ok(());
                }
            }

            // The answers are in the log; the model has to read them next.
            model_dirty = !batch.is_empty();
            context_dirty = false;
            pending = None;
        }
    }

    info!("Turn complete");
    Ok(())
}
