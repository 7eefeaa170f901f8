//! Conversation controller.
//!
//! Drives one session: read a user line, stream the assistant's reply to
//! the console, and when the reply carries a bound tool command, run the
//! tool, feed its result back and stream the follow-up.
//!
//! ```text
//! AwaitingUserTurn ─▶ GeneratingResponse ─┬─▶ ResponseComplete ─▶ AwaitingUserTurn
//!                                         └─▶ ToolDetected ─▶ GeneratingResponse ─▶ ResponseComplete
//! ```
//!
//! Only assistant text is scanned for commands, and only the first response
//! of a turn; the follow-up is never re-scanned, so one user line triggers
//! at most one tool call. Engine and tool failures end the session.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::console::Console;
use super::history::{AuthorRole, ChatHistory};
use super::liveness::Liveness;
use crate::llms::settings::{ExecutionSettings, ToolChoice};
use crate::llms::streaming::{InferenceEngine, StreamAccumulator, StreamChunk};
use crate::records::AgentProfile;
use crate::tools::registry::{ToolRegistry, ToolRequest};
use crate::utilities::errors::Result;
use crate::utilities::prompts::{synthesize, PromptMode};

/// Banner shown when a session starts.
pub const SESSION_BANNER: &str = "The chat session has started.";

/// Default command that ends a session.
pub const DEFAULT_EXIT_COMMAND: &str = "/exit";

// ---------------------------------------------------------------------------
// State and policy
// ---------------------------------------------------------------------------

/// Where the controller is within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    AwaitingUserTurn,
    GeneratingResponse,
    ToolDetected,
    ResponseComplete,
}

/// What happens to the history once a tool turn completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryPolicy {
    /// Drop everything but the system preamble.
    #[default]
    ResetAfterTool,
    /// Keep the tool exchange and append the follow-up reply.
    Retain,
}

impl fmt::Display for HistoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResetAfterTool => write!(f, "reset_after_tool"),
            Self::Retain => write!(f, "retain"),
        }
    }
}

impl FromStr for HistoryPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "reset_after_tool" | "reset" => Ok(Self::ResetAfterTool),
            "retain" => Ok(Self::Retain),
            other => Err(format!("unknown history policy '{}'", other)),
        }
    }
}

/// Session options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationOptions {
    #[serde(default)]
    pub prompt_mode: PromptMode,
    #[serde(default)]
    pub history_policy: HistoryPolicy,
    /// A user line equal to this (after trimming) ends the session.
    /// `None` disables the command.
    #[serde(default = "default_exit_command")]
    pub exit_command: Option<String>,
    #[serde(default)]
    pub settings: ExecutionSettings,
}

fn default_exit_command() -> Option<String> {
    Some(DEFAULT_EXIT_COMMAND.to_string())
}

impl Default for ConversationOptions {
    fn default() -> Self {
        Self {
            prompt_mode: PromptMode::default(),
            history_policy: HistoryPolicy::default(),
            exit_command: default_exit_command(),
            settings: ExecutionSettings::default(),
        }
    }
}

/// Result of one user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A plain reply.
    Completed { response: String },
    /// The reply asked for a tool; `follow_up` is the answer given with its
    /// result in view.
    ToolInvoked {
        tool: String,
        result: String,
        follow_up: String,
    },
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// One interactive session over an injected engine.
pub struct Conversation {
    session_id: Uuid,
    profile: AgentProfile,
    engine: Arc<dyn InferenceEngine>,
    tools: ToolRegistry,
    options: ConversationOptions,
    history: ChatHistory,
    state: TurnState,
    liveness: Liveness,
}

impl fmt::Debug for Conversation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conversation")
            .field("session_id", &self.session_id)
            .field("agent", &self.profile.identity.name)
            .field("engine", &self.engine.name())
            .field("state", &self.state)
            .field("history_len", &self.history.len())
            .finish()
    }
}

impl Conversation {
    /// Start a session whose history holds only the synthesized preamble.
    pub fn new(
        profile: AgentProfile,
        engine: Arc<dyn InferenceEngine>,
        tools: ToolRegistry,
        options: ConversationOptions,
    ) -> Self {
        let history = ChatHistory::with_system(synthesize(&profile, options.prompt_mode));
        Self {
            session_id: Uuid::new_v4(),
            profile,
            engine,
            tools,
            options,
            history,
            state: TurnState::AwaitingUserTurn,
            liveness: Liveness::new(),
        }
    }

    /// Share an externally owned liveness flag, e.g. one a signal handler
    /// also holds.
    pub fn with_liveness(mut self, liveness: Liveness) -> Self {
        self.liveness = liveness;
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn profile(&self) -> &AgentProfile {
        &self.profile
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    fn fresh_history(&self) -> ChatHistory {
        ChatHistory::with_system(synthesize(&self.profile, self.options.prompt_mode))
    }

    fn transition(&mut self, next: TurnState) {
        tracing::debug!(session = %self.session_id, from = ?self.state, to = ?next, "turn state");
        self.state = next;
    }

    /// Run the session until the exit command, end of input, or a stop.
    pub async fn run(&mut self, console: &mut dyn Console) -> Result<()> {
        tracing::info!(
            session = %self.session_id,
            agent = %self.profile.identity.name,
            engine = %self.engine.name(),
            "session started"
        );
        console.announce(SESSION_BANNER)?;

        let liveness = self.liveness.clone();
        while liveness.is_alive() {
            let line = tokio::select! {
                line = console.read_line() => line?,
                _ = liveness.stopped() => break,
            };
            let Some(line) = line else {
                tracing::info!(session = %self.session_id, "console input closed");
                liveness.stop();
                break;
            };
            if self.is_exit_command(&line) {
                liveness.stop();
                break;
            }
            self.respond(&line, console).await?;
        }

        tracing::info!(session = %self.session_id, "session ended");
        Ok(())
    }

    fn is_exit_command(&self, line: &str) -> bool {
        self.options
            .exit_command
            .as_deref()
            .is_some_and(|exit| line.trim() == exit)
    }

    /// Handle one user line, streaming every response to `console`.
    ///
    /// The line is forwarded verbatim, including when empty.
    pub async fn respond(
        &mut self,
        user_input: &str,
        console: &mut dyn Console,
    ) -> Result<TurnOutcome> {
        self.history.add_message(AuthorRole::User, user_input);

        let response = self.generate(console).await?;
        self.history.add_message(AuthorRole::Assistant, response.clone());

        let Some(request) = self.detect(&response) else {
            self.transition(TurnState::ResponseComplete);
            self.transition(TurnState::AwaitingUserTurn);
            return Ok(TurnOutcome::Completed { response });
        };

        self.transition(TurnState::ToolDetected);
        let result = self.tools.invoke(&request).await?;
        tracing::debug!(session = %self.session_id, tool = %request.tool, "tool returned");
        self.history
            .add_message(AuthorRole::Tool, request.result_message(&result));

        let follow_up = self.generate(console).await?;
        self.transition(TurnState::ResponseComplete);
        self.settle_after_tool(&follow_up);
        self.transition(TurnState::AwaitingUserTurn);

        Ok(TurnOutcome::ToolInvoked {
            tool: request.tool,
            result,
            follow_up,
        })
    }

    fn detect(&self, response: &str) -> Option<ToolRequest> {
        if self.options.settings.tool_choice == ToolChoice::None {
            return None;
        }
        self.tools.detect(response)
    }

    fn settle_after_tool(&mut self, follow_up: &str) {
        match self.options.history_policy {
            HistoryPolicy::ResetAfterTool => {
                self.history = self.fresh_history();
                tracing::debug!(session = %self.session_id, "history reset after tool turn");
            }
            HistoryPolicy::Retain => {
                self.history.add_message(AuthorRole::Assistant, follow_up);
            }
        }
    }

    /// Stream one response, echoing fragments in arrival order.
    async fn generate(&mut self, console: &mut dyn Console) -> Result<String> {
        self.transition(TurnState::GeneratingResponse);
        let mut receiver = self
            .engine
            .stream(self.history.messages(), &self.options.settings)
            .await?;

        console.begin_response()?;
        let mut acc = StreamAccumulator::new();
        while let Some(chunk) = receiver.next().await {
            if let StreamChunk::TextDelta { text } = &chunk {
                console.write_fragment(text)?;
            }
            if acc.push(&chunk)? {
                break;
            }
        }
        console.end_response()?;

        tracing::debug!(
            session = %self.session_id,
            fragments = acc.fragments(),
            "response complete"
        );
        Ok(acc.into_text())
    }
}
