//! Interactive conversation over an injected inference engine.
//!
//! - [`history`] - role-tagged message list sent to the engine
//! - [`console`] - line input and streamed output
//! - [`controller`] - the per-session turn loop
//! - [`liveness`] - the stop flag shared with signal handlers

pub mod console;
pub mod controller;
pub mod history;
pub mod liveness;

pub use console::{Console, ScriptedConsole, StdConsole};
pub use controller::{Conversation, ConversationOptions, HistoryPolicy, TurnOutcome, TurnState};
pub use history::{AuthorRole, ChatHistory, ChatMessage};
pub use liveness::Liveness;
