//! Per-request execution settings handed to the inference engine.

use serde::{Deserialize, Serialize};

/// How the engine may use tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolChoice {
    /// The model decides whether to emit a command.
    #[default]
    Auto,
    /// The model must not call tools.
    None,
}

fn default_stop() -> Vec<String> {
    vec!["User:".to_string()]
}

/// Sampling and stopping parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionSettings {
    /// Sampling temperature. Zero is greedy.
    #[serde(default)]
    pub temperature: f64,
    /// Phrases that end generation when produced.
    #[serde(default = "default_stop")]
    pub stop: Vec<String>,
    #[serde(default)]
    pub tool_choice: ToolChoice,
    /// Maximum tokens per turn. `None` leaves it to the engine.
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            stop: default_stop(),
            tool_choice: ToolChoice::Auto,
            max_tokens: None,
        }
    }
}
