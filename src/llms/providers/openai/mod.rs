//! OpenAI-compatible streaming engine.
//!
//! Talks to any server exposing `POST {base_url}/chat/completions` with
//! `stream: true` (OpenAI, llama.cpp `llama-server`, vLLM, Ollama's
//! OpenAI shim). Server-sent `data:` lines are parsed into text fragments;
//! `data: [DONE]` ends the turn.
//!
//! Tool commands travel in-band as text, so no `tools`/`tool_choice` schema
//! is sent. Failures are reported once as [`BifrostError::Engine`]; this
//! engine never retries.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;

use crate::chat::history::ChatMessage;
use crate::llms::settings::ExecutionSettings;
use crate::llms::streaming::{ChannelStreamReceiver, InferenceEngine, StreamChunk, StreamReceiver};
use crate::utilities::errors::{BifrostError, Result};

/// Default local endpoint (llama.cpp server).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/v1";

/// Channel depth between the HTTP reader task and the consumer.
const CHUNK_BUFFER: usize = 64;

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Streaming chat-completions client.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleEngine {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiCompatibleEngine {
    /// Create an engine for `model` at `base_url`.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Build the request body for a streaming call.
    pub fn build_request_body(
        &self,
        messages: &[ChatMessage],
        settings: &ExecutionSettings,
    ) -> Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": settings.temperature,
            "stream": true,
        });
        if !settings.stop.is_empty() {
            body["stop"] = serde_json::json!(settings.stop);
        }
        if let Some(max_tokens) = settings.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
        body
    }
}

#[async_trait]
impl InferenceEngine for OpenAiCompatibleEngine {
    fn name(&self) -> &str {
        &self.model
    }

    async fn stream(
        &self,
        messages: &[ChatMessage],
        settings: &ExecutionSettings,
    ) -> Result<Box<dyn StreamReceiver>> {
        log::debug!(
            "OpenAiCompatibleEngine.stream: model={}, messages={}",
            self.model,
            messages.len()
        );

        let body = self.build_request_body(messages, settings);
        let mut request = self
            .http
            .post(self.endpoint())
            .header("Accept", "text/event-stream")
            .json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(BifrostError::Engine(format!(
                "chat completions request failed ({}): {}",
                status,
                text.chars().take(500).collect::<String>()
            )));
        }

        let (tx, rx) = ChannelStreamReceiver::pair(CHUNK_BUFFER);
        let mut bytes = response.bytes_stream();
        tokio::spawn(async move {
            let mut parser = SseParser::default();
            while let Some(item) = bytes.next().await {
                let chunk = match item {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        let _ = tx.send(StreamChunk::Error { message: e.to_string() }).await;
                        return;
                    }
                };
                for event in parser.feed(&chunk) {
                    let terminal = !matches!(event, StreamChunk::TextDelta { .. });
                    if tx.send(event).await.is_err() || terminal {
                        return;
                    }
                }
            }
            // Connection closed without [DONE].
            let _ = tx.send(StreamChunk::Done).await;
        });

        Ok(Box::new(rx))
    }
}

// ---------------------------------------------------------------------------
// SSE parsing
// ---------------------------------------------------------------------------

/// Incremental parser for chat-completions server-sent events.
///
/// Bytes may split anywhere, including inside a UTF-8 sequence, so input is
/// buffered until a full line is available.
#[derive(Debug, Default)]
pub struct SseParser {
    pending: Vec<u8>,
}

impl SseParser {
    /// Feed raw bytes, returning every chunk completed by them.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<StreamChunk> {
        self.pending.extend_from_slice(bytes);
        let mut out = Vec::new();
        while let Some(newline) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(chunk) = parse_line(line.trim_end_matches(['\r', '\n'])) {
                out.push(chunk);
            }
        }
        out
    }
}

fn parse_line(line: &str) -> Option<StreamChunk> {
    let payload = line.strip_prefix("data:")?.trim();
    if payload.is_empty() {
        return None;
    }
    if payload == "[DONE]" {
        return Some(StreamChunk::Done);
    }
    let json: Value = match serde_json::from_str(payload) {
        Ok(json) => json,
        Err(e) => {
            return Some(StreamChunk::Error {
                message: format!("malformed stream event: {}", e),
            })
        }
    };
    if let Some(error) = json.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Some(StreamChunk::Error { message });
    }
    let text = json
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())?;
    Some(StreamChunk::TextDelta { text: text.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::history::AuthorRole;

    fn engine() -> OpenAiCompatibleEngine {
        OpenAiCompatibleEngine::new("http://localhost:8080/v1/", "bitnet", None, None).unwrap()
    }

    #[test]
    fn test_endpoint_trims_slash() {
        assert_eq!(engine().endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_request_body() {
        let messages = vec![
            ChatMessage::new(AuthorRole::System, "sys"),
            ChatMessage::new(AuthorRole::Tool, "Current Time: x"),
        ];
        let body = engine().build_request_body(&messages, &ExecutionSettings::default());
        assert_eq!(body["model"], "bitnet");
        assert_eq!(body["stream"], true);
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["stop"][0], "User:");
        assert_eq!(body["messages"][1]["role"], "tool");
        assert!(body.get("max_tokens").is_none());
        assert!(body.get("tool_choice").is_none());
    }

    #[test]
    fn test_sse_deltas_and_done() {
        let mut parser = SseParser::default();
        let mut chunks = parser.feed(b"data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n");
        chunks.extend(parser.feed(b"data: {\"choices\":[{\"delta\":{\"con"));
        chunks.extend(parser.feed(b"tent\":\"lo\"}}]}\r\n: keep-alive\ndata: [DONE]\n"));
        assert_eq!(
            chunks,
            vec![
                StreamChunk::TextDelta { text: "Hel".into() },
                StreamChunk::TextDelta { text: "lo".into() },
                StreamChunk::Done,
            ]
        );
    }

    #[test]
    fn test_sse_split_utf8() {
        let line = "data: {\"choices\":[{\"delta\":{\"content\":\"é\"}}]}\n".as_bytes();
        let split = line.iter().position(|b| *b == 0xC3).unwrap() + 1;
        let mut parser = SseParser::default();
        assert!(parser.feed(&line[..split]).is_empty());
        assert_eq!(
            parser.feed(&line[split..]),
            vec![StreamChunk::TextDelta { text: "é".into() }]
        );
    }

    #[test]
    fn test_sse_role_only_delta_skipped() {
        let mut parser = SseParser::default();
        assert!(parser
            .feed(b"data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n")
            .is_empty());
    }

    #[test]
    fn test_sse_errors() {
        let mut parser = SseParser::default();
        assert!(matches!(
            parser.feed(b"data: {not json\n").as_slice(),
            [StreamChunk::Error { .. }]
        ));
        assert_eq!(
            parser.feed(b"data: {\"error\":{\"message\":\"model not loaded\"}}\n"),
            vec![StreamChunk::Error { message: "model not loaded".into() }]
        );
    }
}
