//! Interactive bifrost session.
//!
//! Decodes an agent genome, then chats with it through an OpenAI-compatible
//! streaming endpoint.
//!
//! # Environment Variables
//!
//! - `BIFROST_BASE_URL`: API root (default: `http://127.0.0.1:8080/v1`)
//! - `BIFROST_MODEL`: model name (default: `bitnet`)
//! - `BIFROST_API_KEY`: bearer token, if the server wants one
//! - `BIFROST_TEMPERATURE`: sampling temperature (default: 0)
//! - `BIFROST_TIMEOUT_SECS`: per-request timeout
//! - `BIFROST_PROMPT_MODE`: `narrative` (default) or `transcript`
//! - `BIFROST_HISTORY_POLICY`: `reset_after_tool` (default) or `retain`
//! - `BIFROST_EXIT_COMMAND`: ends the session (default: `/exit`, empty disables)
//! - `BIFROST_GENOME_FILE`: genome text file (default: built-in demo agent)
//! - `BIFROST_CONFIG`: YAML config file, used instead of the variables above
//! - `RUST_LOG`: tracing filter (default: "info,bifrost=debug")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin bifrost
//! ```

use std::sync::Arc;

use anyhow::Context;
use bifrost::chat::{Conversation, Liveness, StdConsole};
use bifrost::genetics::{GenomeBuilder, NibbleCodec};
use bifrost::llms::OpenAiCompatibleEngine;
use bifrost::records::{AgentProfile, Capabilities, CognitiveProcess, Gender, Identity, Persona};
use bifrost::tools::ToolRegistry;
use bifrost::BifrostConfig;

/// Genome for the built-in demo agent.
fn demo_genome(codec: &NibbleCodec) -> String {
    let profile = AgentProfile {
        identity: Identity {
            name: "Eva".into(),
            persona: Persona {
                gender: Gender::Female,
                profession: "Software Engineer".into(),
                personality_descriptors: vec!["friendly".into(), "precise".into()],
            },
        },
        cognitive_process: CognitiveProcess {
            chain_of_thought: "Read the question carefully, then answer in one or two sentences."
                .into(),
        },
        capabilities: Capabilities::default(),
    };
    GenomeBuilder::from_profile(codec, &profile)
}

fn load_config() -> anyhow::Result<BifrostConfig> {
    let config = match std::env::var("BIFROST_CONFIG") {
        Ok(path) if !path.trim().is_empty() => BifrostConfig::from_yaml_file(&path)
            .with_context(|| format!("loading config from {}", path))?,
        _ => BifrostConfig::from_env()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bifrost=debug".into()),
        )
        .init();

    let config = load_config()?;
    let codec = NibbleCodec::new();

    let genome = match &config.genome_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading genome {}", path.display()))?
            .trim()
            .to_string(),
        None => demo_genome(&codec),
    };
    let profile = bifrost::assemble(&genome, &codec)?;

    let engine = OpenAiCompatibleEngine::new(
        &config.base_url,
        &config.model,
        config.api_key.clone(),
        config.request_timeout(),
    )?;
    tracing::info!(base_url = %config.base_url, model = %config.model, "engine ready");

    let liveness = Liveness::new();
    let handle = liveness.clone();
    ctrlc::set_handler(move || {
        if !handle.is_alive() {
            // Second interrupt while a response is still streaming.
            std::process::exit(130);
        }
        handle.stop();
    })
    .context("installing Ctrl-C handler")?;

    let mut console = StdConsole::new(profile.identity.name.clone());
    let mut conversation = Conversation::new(
        profile,
        Arc::new(engine),
        ToolRegistry::with_defaults()?,
        config.conversation_options(),
    )
    .with_liveness(liveness);

    conversation.run(&mut console).await?;
    Ok(())
}
