//! # Weft Tools
//!
//! The tool execution boundary: an ordered registry of `ToolProvider`s and
//! the dispatch logic that turns every outcome — success or failure — into
//! a tool message the model can read.

pub mod executor;

pub use executor::ToolExecutor;
