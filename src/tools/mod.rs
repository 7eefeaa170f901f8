//! Tools the model can call mid-conversation.
//!
//! - [`base_tool`] - the [`BaseTool`] trait and the closure-backed [`Tool`]
//! - [`command`] - the bracketed in-band command grammar
//! - [`registry`] - name → tool table plus marker → tool-name bindings
//! - [`temporal`] - the clock tool

pub mod base_tool;
pub mod command;
pub mod registry;
pub mod temporal;

// Re-exports for convenience
pub use base_tool::{BaseTool, Tool, ToolError, ToolFn};
pub use command::{parse_commands, ToolCommand};
pub use registry::{ToolRegistry, ToolRequest};
