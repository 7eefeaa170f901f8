//! # Bifrost
//!
//! Agent profiles encoded as genome text, and a streaming tool-calling
//! conversation loop driven by them.
//!
//! ```text
//! genome text ─▶ GenomeFramer ─▶ CodonCodec ─▶ ConfigRecord ─▶ AgentProfile
//!                                                                  │
//!                                     synthesize (system preamble) ◀┘
//!                                                  │
//!          Console ◀──▶ Conversation ◀──▶ InferenceEngine
//!                            │
//!                       ToolRegistry
//! ```

pub mod bootstrap;
pub mod chat;
pub mod genetics;
pub mod llms;
pub mod records;
pub mod tools;
pub mod utilities;

pub use bootstrap::assemble;
pub use chat::{Conversation, ConversationOptions, HistoryPolicy};
pub use genetics::{CodonCodec, GenomeBuilder, NibbleCodec};
pub use llms::{InferenceEngine, OpenAiCompatibleEngine};
pub use records::AgentProfile;
pub use tools::ToolRegistry;
pub use utilities::config::BifrostConfig;
pub use utilities::errors::{BifrostError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
