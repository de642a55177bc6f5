//! # Weft Core
//!
//! Domain types, traits, and error definitions for the Weft agent
//! orchestration engine. This crate has **zero framework dependencies** —
//! it defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every subsystem is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod log;
pub mod message;
pub mod model;
pub mod token;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, LogError, ModelError, Result, ToolError};
pub use log::ConversationLog;
pub use message::{Message, Role, ToolCall};
pub use model::{ModelClient, TokenStream};
pub use token::Token;
pub use tool::{ToolDefinition, ToolProvider};
