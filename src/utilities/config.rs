//! Runtime configuration.
//!
//! Loaded from `BIFROST_*` environment variables or a YAML file. Every field
//! has a default, so an empty environment yields a working local setup
//! against a llama.cpp server on port 8080.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chat::controller::{ConversationOptions, HistoryPolicy, DEFAULT_EXIT_COMMAND};
use crate::llms::providers::openai::DEFAULT_BASE_URL;
use crate::llms::settings::ExecutionSettings;
use crate::utilities::errors::{BifrostError, Result};
use crate::utilities::prompts::PromptMode;

/// Default model name sent to the engine.
pub const DEFAULT_MODEL: &str = "bitnet";

/// Session and engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BifrostConfig {
    /// OpenAI-compatible API root, e.g. `http://127.0.0.1:8080/v1`.
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f64,
    /// Per-request timeout in seconds. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub prompt_mode: PromptMode,
    pub history_policy: HistoryPolicy,
    /// `None` disables the exit command.
    pub exit_command: Option<String>,
    /// Genome text file; the built-in demo genome is used when unset.
    pub genome_file: Option<PathBuf>,
}

impl Default for BifrostConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            temperature: 0.0,
            request_timeout_secs: None,
            prompt_mode: PromptMode::default(),
            history_policy: HistoryPolicy::default(),
            exit_command: Some(DEFAULT_EXIT_COMMAND.to_string()),
            genome_file: None,
        }
    }
}

impl BifrostConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup, using the `BIFROST_*` variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let temperature = match var("BIFROST_TEMPERATURE") {
            Some(raw) => raw.trim().parse::<f64>().map_err(|e| {
                BifrostError::Config(format!("BIFROST_TEMPERATURE '{}': {}", raw, e))
            })?,
            None => defaults.temperature,
        };
        let request_timeout_secs = match var("BIFROST_TIMEOUT_SECS") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                BifrostError::Config(format!("BIFROST_TIMEOUT_SECS '{}': {}", raw, e))
            })?),
            None => defaults.request_timeout_secs,
        };
        let prompt_mode = match var("BIFROST_PROMPT_MODE") {
            Some(raw) => raw.parse::<PromptMode>().map_err(BifrostError::Config)?,
            None => defaults.prompt_mode,
        };
        let history_policy = match var("BIFROST_HISTORY_POLICY") {
            Some(raw) => raw.parse::<HistoryPolicy>().map_err(BifrostError::Config)?,
            None => defaults.history_policy,
        };
        // Set but empty disables the command.
        let exit_command = match lookup("BIFROST_EXIT_COMMAND") {
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(raw.trim().to_string()),
            None => defaults.exit_command,
        };

        Ok(Self {
            base_url: var("BIFROST_BASE_URL").unwrap_or(defaults.base_url),
            model: var("BIFROST_MODEL").unwrap_or(defaults.model),
            api_key: var("BIFROST_API_KEY"),
            temperature,
            request_timeout_secs,
            prompt_mode,
            history_policy,
            exit_command,
            genome_file: var("BIFROST_GENOME_FILE").map(PathBuf::from),
        })
    }

    /// Load from a YAML file. Missing fields take their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&text).map_err(|e| {
            BifrostError::Config(format!("invalid config file {}: {}", path.display(), e))
        })
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn execution_settings(&self) -> ExecutionSettings {
        ExecutionSettings {
            temperature: self.temperature,
            ..ExecutionSettings::default()
        }
    }

    pub fn conversation_options(&self) -> ConversationOptions {
        ConversationOptions {
            prompt_mode: self.prompt_mode,
            history_policy: self.history_policy,
            exit_command: self.exit_command.clone(),
            settings: self.execution_settings(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = BifrostConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, BifrostConfig::default());
        assert_eq!(config.base_url, "http://127.0.0.1:8080/v1");
        assert_eq!(config.exit_command.as_deref(), Some("/exit"));
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_environment_overrides() {
        let config = BifrostConfig::from_lookup(lookup(&[
            ("BIFROST_MODEL", "llama-3"),
            ("BIFROST_TEMPERATURE", "0.4"),
            ("BIFROST_PROMPT_MODE", "transcript"),
            ("BIFROST_HISTORY_POLICY", "retain"),
            ("BIFROST_EXIT_COMMAND", ""),
            ("BIFROST_GENOME_FILE", "/tmp/eva.genome"),
            ("BIFROST_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.model, "llama-3");
        assert_eq!(config.prompt_mode, PromptMode::Transcript);
        assert_eq!(config.history_policy, HistoryPolicy::Retain);
        assert_eq!(config.exit_command, None);
        assert_eq!(config.genome_file, Some(PathBuf::from("/tmp/eva.genome")));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));

        let options = config.conversation_options();
        assert_eq!(options.settings.temperature, 0.4);
        assert_eq!(options.settings.stop, vec!["User:"]);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        for pair in [
            ("BIFROST_TEMPERATURE", "warm"),
            ("BIFROST_PROMPT_MODE", "poem"),
            ("BIFROST_HISTORY_POLICY", "forget"),
        ] {
            let err = BifrostConfig::from_lookup(lookup(&[pair])).unwrap_err();
            assert!(matches!(err, BifrostError::Config(_)), "{:?}", pair);
        }
    }

    #[test]
    fn test_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model: phi-3\nhistory_policy: retain\nexit_command: /quit").unwrap();

        let config = BifrostConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.model, "phi-3");
        assert_eq!(config.history_policy, HistoryPolicy::Retain);
        assert_eq!(config.exit_command.as_deref(), Some("/quit"));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_yaml_file_errors() {
        assert!(matches!(
            BifrostConfig::from_yaml_file("/nonexistent/bifrost.yaml"),
            Err(BifrostError::Io(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "temperature: [1, 2]").unwrap();
        assert!(matches!(
            BifrostConfig::from_yaml_file(file.path()),
            Err(BifrostError::Config(_))
        ));
    }
}
