//! # Weft Memory
//!
//! `ConversationLog` backends. The log is the single source of truth for a
//! conversation; everything here implements the trait defined in
//! `weft-core`.
//!
//! Backends:
//! - [`InMemoryLog`] — plain `Vec` behind a lock; tests and ephemeral
//!   sessions.
//! - [`JsonFileLog`] — one JSON document on disk, loaded on initialize and
//!   rewritten on every mutation.
//! - [`SummarizingLog`] — a decorator over any inner log that keeps its
//!   length bounded by replacing overflowed history with a model-generated
//!   summary.

pub mod in_memory;
pub mod json_file;
pub mod summarizing;

pub use in_memory::InMemoryLog;
pub use json_file::JsonFileLog;
pub use summarizing::{CompactionPolicy, SummarizingLog};
