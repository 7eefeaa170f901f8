//! Canned-response engine for offline sessions and tests.
//!
//! Each call to [`InferenceEngine::stream`] consumes the next scripted turn
//! and records the history it was asked to continue.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::settings::ExecutionSettings;
use super::streaming::{InferenceEngine, StreamChunk, StreamReceiver};
use crate::chat::history::ChatMessage;
use crate::utilities::errors::{BifrostError, Result};

/// One scripted engine turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedTurn {
    /// Stream these fragments, then finish.
    Reply(Vec<String>),
    /// Stream these fragments, then fail mid-stream.
    FailAfter(Vec<String>, String),
    /// Refuse to start the stream.
    Refuse(String),
}

impl ScriptedTurn {
    /// A reply split into the given fragments.
    pub fn reply<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Reply(fragments.into_iter().map(Into::into).collect())
    }
}

/// Replays [`ScriptedTurn`]s in order.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    turns: Mutex<VecDeque<ScriptedTurn>>,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedEngine {
    pub fn new(turns: impl IntoIterator<Item = ScriptedTurn>) -> Self {
        Self {
            turns: Mutex::new(turns.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Histories passed to each `stream` call, oldest first.
    pub fn seen_histories(&self) -> Vec<Vec<ChatMessage>> {
        self.seen.lock().clone()
    }

    pub fn remaining_turns(&self) -> usize {
        self.turns.lock().len()
    }
}

struct ReplayReceiver {
    chunks: VecDeque<StreamChunk>,
}

#[async_trait]
impl StreamReceiver for ReplayReceiver {
    async fn next(&mut self) -> Option<StreamChunk> {
        self.chunks.pop_front()
    }
}

fn deltas(fragments: Vec<String>) -> VecDeque<StreamChunk> {
    fragments
        .into_iter()
        .map(|text| StreamChunk::TextDelta { text })
        .collect()
}

#[async_trait]
impl InferenceEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn stream(
        &self,
        messages: &[ChatMessage],
        _settings: &ExecutionSettings,
    ) -> Result<Box<dyn StreamReceiver>> {
        self.seen.lock().push(messages.to_vec());
        let turn = self
            .turns
            .lock()
            .pop_front()
            .ok_or_else(|| BifrostError::Engine("script exhausted".into()))?;

        let chunks = match turn {
            ScriptedTurn::Reply(fragments) => {
                let mut chunks = deltas(fragments);
                chunks.push_back(StreamChunk::Done);
                chunks
            }
            ScriptedTurn::FailAfter(fragments, message) => {
                let mut chunks = deltas(fragments);
                chunks.push_back(StreamChunk::Error { message });
                chunks
            }
            ScriptedTurn::Refuse(message) => return Err(BifrostError::Engine(message)),
        };
        Ok(Box::new(ReplayReceiver { chunks }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::history::AuthorRole;

    #[tokio::test]
    async fn test_replays_in_order() {
        let engine = ScriptedEngine::new([
            ScriptedTurn::reply(["a", "b"]),
            ScriptedTurn::Refuse("offline".into()),
        ]);
        let history = vec![ChatMessage::new(AuthorRole::User, "hi")];
        let settings = ExecutionSettings::default();

        let mut rx = engine.stream(&history, &settings).await.unwrap();
        assert_eq!(rx.next().await, Some(StreamChunk::TextDelta { text: "a".into() }));
        assert_eq!(rx.next().await, Some(StreamChunk::TextDelta { text: "b".into() }));
        assert_eq!(rx.next().await, Some(StreamChunk::Done));
        assert_eq!(rx.next().await, None);

        assert!(engine.stream(&history, &settings).await.is_err());
        assert!(engine.stream(&history, &settings).await.is_err());
        assert_eq!(engine.seen_histories().len(), 3);
    }
}
