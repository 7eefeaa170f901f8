//! Streaming inference boundary.
//!
//! Provides the [`InferenceEngine`] trait the conversation loop consumes.
//! An engine turns a role-tagged history into a finite stream of text
//! fragments; the end of the stream marks the end of the turn.
//!
//! # Design
//!
//! - Injected: sessions hold an `Arc<dyn InferenceEngine>` and never own
//!   model lifecycle, so one loaded model can serve many sessions.
//! - Chunk-based: the stream yields [`StreamChunk`] values, each a text
//!   delta, an explicit end marker, or an error.
//! - Pull-based: the caller drives the [`StreamReceiver`]; a receiver that
//!   returns `None` has ended the turn just like `Done`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::settings::ExecutionSettings;
use crate::chat::history::ChatMessage;
use crate::utilities::errors::{BifrostError, Result};

// ---------------------------------------------------------------------------
// StreamChunk
// ---------------------------------------------------------------------------

/// A single chunk from a streaming response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamChunk {
    /// A text fragment.
    TextDelta { text: String },

    /// The engine finished the turn.
    Done,

    /// The engine failed mid-stream.
    Error { message: String },
}

// ---------------------------------------------------------------------------
// InferenceEngine trait
// ---------------------------------------------------------------------------

/// A text-generation engine with streaming output.
///
/// # Example
///
/// ```ignore
/// struct MyEngine { /* ... */ }
///
/// #[async_trait]
/// impl InferenceEngine for MyEngine {
///     async fn stream(
///         &self,
///         messages: &[ChatMessage],
///         settings: &ExecutionSettings,
///     ) -> Result<Box<dyn StreamReceiver>> {
///         // ... start generation, hand back a receiver ...
///     }
/// }
/// ```
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str {
        "engine"
    }

    /// Start generating a continuation of `messages`.
    async fn stream(
        &self,
        messages: &[ChatMessage],
        settings: &ExecutionSettings,
    ) -> Result<Box<dyn StreamReceiver>>;
}

/// Receiver for streaming chunks.
#[async_trait]
pub trait StreamReceiver: Send {
    /// Get the next chunk. `None` ends the stream.
    async fn next(&mut self) -> Option<StreamChunk>;
}

// ---------------------------------------------------------------------------
// ChannelStreamReceiver
// ---------------------------------------------------------------------------

/// A `StreamReceiver` backed by a tokio mpsc channel.
///
/// Used by engines that push chunks from a background task.
pub struct ChannelStreamReceiver {
    rx: tokio::sync::mpsc::Receiver<StreamChunk>,
}

impl ChannelStreamReceiver {
    pub fn new(rx: tokio::sync::mpsc::Receiver<StreamChunk>) -> Self {
        Self { rx }
    }

    /// Create a matched pair of sender + receiver.
    pub fn pair(buffer: usize) -> (tokio::sync::mpsc::Sender<StreamChunk>, Self) {
        let (tx, rx) = tokio::sync::mpsc::channel(buffer);
        (tx, Self { rx })
    }
}

#[async_trait]
impl StreamReceiver for ChannelStreamReceiver {
    async fn next(&mut self) -> Option<StreamChunk> {
        self.rx.recv().await
    }
}

// ---------------------------------------------------------------------------
// StreamAccumulator
// ---------------------------------------------------------------------------

/// Accumulates text deltas into the turn's response buffer.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    text: String,
    fragments: usize,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a chunk, returning `true` once the stream is done.
    ///
    /// An `Error` chunk becomes [`BifrostError::Engine`].
    pub fn push(&mut self, chunk: &StreamChunk) -> Result<bool> {
        match chunk {
            StreamChunk::TextDelta { text } => {
                self.text.push_str(text);
                self.fragments += 1;
                Ok(false)
            }
            StreamChunk::Done => Ok(true),
            StreamChunk::Error { message } => Err(BifrostError::Engine(message.clone())),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn fragments(&self) -> usize {
        self.fragments
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
