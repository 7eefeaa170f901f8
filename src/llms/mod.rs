//! Inference engines.
//!
//! - [`streaming`] - the [`InferenceEngine`] trait and stream plumbing
//! - [`settings`] - per-request sampling settings
//! - [`scripted`] - canned replies for offline runs
//! - [`providers`] - HTTP-backed engines

pub mod providers;
pub mod scripted;
pub mod settings;
pub mod streaming;

pub use providers::openai::OpenAiCompatibleEngine;
pub use scripted::{ScriptedEngine, ScriptedTurn};
pub use settings::{ExecutionSettings, ToolChoice};
pub use streaming::{
    ChannelStreamReceiver, InferenceEngine, StreamAccumulator, StreamChunk, StreamReceiver,
};
