//! System preamble synthesis from an [`AgentProfile`].
//!
//! [`synthesize`] is pure: the same profile and mode always give the same
//! text. Both modes end with the time-tool directive that tells the model to
//! emit [`GET_TIME_COMMAND`] when it needs the clock.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::records::AgentProfile;
use crate::tools::command::render_command;
use crate::tools::temporal::GET_TIME_MARKER;

/// Literal command text the model is told to produce for the clock tool.
pub static GET_TIME_COMMAND: once_cell::sync::Lazy<String> =
    once_cell::sync::Lazy::new(|| render_command(GET_TIME_MARKER));

/// Preamble layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptMode {
    /// One descriptive paragraph with gendered pronouns.
    #[default]
    Narrative,
    /// A label/value block.
    Transcript,
}

impl fmt::Display for PromptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Narrative => write!(f, "narrative"),
            Self::Transcript => write!(f, "transcript"),
        }
    }
}

impl FromStr for PromptMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "narrative" => Ok(Self::Narrative),
            "transcript" => Ok(Self::Transcript),
            other => Err(format!("unknown prompt mode '{}'", other)),
        }
    }
}

fn tool_directive() -> String {
    format!(
        "If the user wants to know the time, reply with the command '{}' and nothing else. \
         Once a tool result appears in the chat history, use it to answer the user. \
         Do not repeat yourself.",
        GET_TIME_COMMAND.as_str()
    )
}

/// Build the system preamble for `profile`.
pub fn synthesize(profile: &AgentProfile, mode: PromptMode) -> String {
    match mode {
        PromptMode::Narrative => narrative(profile),
        PromptMode::Transcript => transcript(profile),
    }
}

fn narrative(profile: &AgentProfile) -> String {
    let identity = &profile.identity;
    let persona = &identity.persona;
    format!(
        "This is a dialog transcript where the User interacts with an assistant named {name}. \
         {name} works as a {profession} and possesses qualities such as {qualities}. \
         {pronoun} always responds immediately and precisely. {directive}",
        name = identity.name,
        profession = persona.profession,
        qualities = persona.personality_descriptors.join(", "),
        pronoun = persona.gender.pronoun_capitalized(),
        directive = tool_directive(),
    )
}

fn transcript(profile: &AgentProfile) -> String {
    let identity = &profile.identity;
    let persona = &identity.persona;
    let mut prompt = String::from("Transcript of a dialog for in-context training:\n");
    prompt.push_str("Identity:\n");
    prompt.push_str(&format!("  Name: {}\n", identity.name));
    prompt.push_str(&format!("  Gender: {}\n", persona.gender));
    prompt.push_str(&format!("  Profession: {}\n", persona.profession));
    prompt.push_str(&format!(
        "  Personality Descriptors: {}\n\n",
        persona.personality_descriptors.join(", ")
    ));
    prompt.push_str("Cognitive Process:\n");
    prompt.push_str(&profile.cognitive_process.chain_of_thought);
    prompt.push('\n');
    if !profile.capabilities.skills.is_empty() {
        prompt.push_str(&format!("Skills: {}\n", profile.capabilities.skills.join(", ")));
    }
    prompt.push_str("Rules: Provide precise and immediate responses. ");
    prompt.push_str(&tool_directive());
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Capabilities, CognitiveProcess, Gender, Identity, Persona};

    fn profile(gender: Gender) -> AgentProfile {
        AgentProfile {
            identity: Identity {
                name: "Eva".into(),
                persona: Persona {
                    gender,
                    profession: "Assistant".into(),
                    personality_descriptors: vec![
                        "expert".into(),
                        "analytical".into(),
                        "creative".into(),
                    ],
                },
            },
            cognitive_process: CognitiveProcess { chain_of_thought: "Step 1...".into() },
            capabilities: Capabilities::default(),
        }
    }

    #[test]
    fn test_narrative_mentions_identity() {
        let text = synthesize(&profile(Gender::Female), PromptMode::Narrative);
        assert!(text.contains("named Eva"));
        assert!(text.contains("works as a Assistant"));
        assert!(text.contains("expert, analytical, creative"));
        assert!(text.contains("She always responds"));
        assert!(text.contains("'[GET TIME]'"));
    }

    #[test]
    fn test_narrative_pronouns_follow_gender() {
        assert!(synthesize(&profile(Gender::Male), PromptMode::Narrative).contains("He always"));
        assert!(synthesize(&profile(Gender::None), PromptMode::Narrative).contains("It always"));
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let p = profile(Gender::Female);
        assert_eq!(
            synthesize(&p, PromptMode::Narrative),
            synthesize(&p, PromptMode::Narrative)
        );
        assert_eq!(
            synthesize(&p, PromptMode::Transcript),
            synthesize(&p, PromptMode::Transcript)
        );
    }

    #[test]
    fn test_transcript_layout() {
        let mut p = profile(Gender::Female);
        let text = synthesize(&p, PromptMode::Transcript);
        assert!(text.starts_with("Transcript of a dialog for in-context training:\nIdentity:\n"));
        assert!(text.contains("  Name: Eva\n"));
        assert!(text.contains("  Gender: Female\n"));
        assert!(text.contains("Cognitive Process:\nStep 1...\n"));
        assert!(!text.contains("Skills:"));
        assert!(!text.contains("She "));
        assert!(text.ends_with("Do not repeat yourself."));

        p.capabilities.skills = vec!["TemporalAwareness".into()];
        assert!(synthesize(&p, PromptMode::Transcript).contains("Skills: TemporalAwareness\n"));
    }

    #[test]
    fn test_prompt_mode_parse() {
        assert_eq!("Transcript".parse::<PromptMode>().unwrap(), PromptMode::Transcript);
        assert!("poem".parse::<PromptMode>().is_err());
    }
}
