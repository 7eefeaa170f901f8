//! In-band tool command grammar.
//!
//! The model asks for a tool by writing a bracketed command anywhere in its
//! reply:
//!
//! ```text
//! command = "[" marker [ ":" payload ] "]"
//! marker  = WORD *( " " WORD )        ; WORD = [A-Z][A-Z0-9_]*, first; [A-Z0-9_]+ after
//! payload = *( any char except "[" and "]" )
//! ```
//!
//! Markers are case-sensitive. For a payload-less marker, a reply contains
//! the command exactly when it contains the literal `[MARKER]` text.

use once_cell::sync::Lazy;
use regex::Regex;

static COMMAND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([A-Z][A-Z0-9_]*(?: [A-Z0-9_]+)*)(?::([^\[\]]*))?\]")
        .expect("command grammar regex is valid")
});

static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][A-Z0-9_]*(?: [A-Z0-9_]+)*$").expect("marker regex is valid")
});

/// A command parsed out of model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub marker: String,
    pub payload: Option<String>,
}

/// True if `marker` fits the grammar.
pub fn is_valid_marker(marker: &str) -> bool {
    MARKER_RE.is_match(marker)
}

/// The literal text a model writes to invoke `marker` without a payload.
pub fn render_command(marker: &str) -> String {
    format!("[{}]", marker)
}

/// Every command in `text`, left to right.
pub fn parse_commands(text: &str) -> impl Iterator<Item = ToolCommand> + '_ {
    COMMAND_RE.captures_iter(text).map(|caps| ToolCommand {
        marker: caps[1].to_string(),
        payload: caps
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .filter(|p| !p.is_empty()),
    })
}
