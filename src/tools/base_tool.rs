//! Base tool definitions.
//!
//! Provides the [`BaseTool`] trait and the concrete [`Tool`] struct that
//! wraps a callable. Tools take no required arguments; a command may carry
//! an optional free-text payload, which the tool is free to ignore.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

/// Error type returned by tool callables.
pub type ToolError = Box<dyn std::error::Error + Send + Sync>;

// ---------------------------------------------------------------------------
// BaseTool trait
// ---------------------------------------------------------------------------

/// A side-effecting capability the conversation can invoke mid-turn.
#[async_trait]
pub trait BaseTool: Send + Sync + fmt::Debug {
    /// Unique name used by the registry and the marker table.
    fn name(&self) -> &str;

    /// Human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// How many times this tool has run successfully.
    fn usage_count(&self) -> u32 {
        0
    }

    /// Synchronous execution.
    fn run(&self, payload: Option<&str>) -> Result<String, ToolError>;

    /// Asynchronous execution. Defaults to [`BaseTool::run`].
    async fn arun(&self, payload: Option<&str>) -> Result<String, ToolError> {
        self.run(payload)
    }
}

// ---------------------------------------------------------------------------
// Tool struct (wraps a callable function)
// ---------------------------------------------------------------------------

/// Type alias for a shared synchronous tool function.
pub type ToolFn = Arc<dyn Fn(Option<&str>) -> Result<String, ToolError> + Send + Sync>;

/// Concrete tool wrapping a function.
pub struct Tool {
    tool_name: String,
    tool_description: String,
    func: ToolFn,
    uses: AtomicU32,
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.tool_name)
            .field("description", &self.tool_description)
            .field("uses", &self.uses.load(Ordering::Relaxed))
            .finish()
    }
}

impl Tool {
    pub fn new(name: impl Into<String>, description: impl Into<String>, func: ToolFn) -> Self {
        Self {
            tool_name: name.into(),
            tool_description: description.into(),
            func,
            uses: AtomicU32::new(0),
        }
    }

    /// Convenience constructor for closures that ignore the payload.
    pub fn from_fn<F>(name: impl Into<String>, description: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> Result<String, ToolError> + Send + Sync + 'static,
    {
        Self::new(name, description, Arc::new(move |_: Option<&str>| f()))
    }
}

#[async_trait]
impl BaseTool for Tool {
    fn name(&self) -> &str {
        &self.tool_name
    }

    fn description(&self) -> &str {
        &self.tool_description
    }

    fn usage_count(&self) -> u32 {
        self.uses.load(Ordering::Relaxed)
    }

    fn run(&self, payload: Option<&str>) -> Result<String, ToolError> {
        let result = (self.func)(payload)?;
        self.uses.fetch_add(1, Ordering::Relaxed);
        Ok(result)
    }
}
