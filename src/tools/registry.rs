//! Tool registry and marker table.
//!
//! Tools are indexed by unique name. A separate marker table maps command
//! markers (see [`super::command`]) to tool names, so the conversation loop
//! can tell several in-band commands apart without knowing any tool by name.

use std::collections::HashMap;
use std::sync::Arc;

use super::base_tool::BaseTool;
use super::command::{is_valid_marker, parse_commands, ToolCommand};
use super::temporal::{clock_tool, GET_CURRENT_TIME, GET_TIME_MARKER, TIME_RESULT_PREFIX};
use crate::utilities::errors::{BifrostError, Result};

/// What a marker resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerBinding {
    pub tool: String,
    /// Prepended to the tool output in the tool-role message.
    pub result_prefix: String,
}

/// A detected command resolved to a registered tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequest {
    pub tool: String,
    pub result_prefix: String,
    pub command: ToolCommand,
}

impl ToolRequest {
    /// Content of the tool-role message reporting `output`.
    pub fn result_message(&self, output: &str) -> String {
        format!("{}{}", self.result_prefix, output)
    }
}

/// Name-indexed tool table plus the marker → tool-name mapping.
#[derive(Debug, Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn BaseTool>>,
    markers: HashMap<String, MarkerBinding>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the clock tool bound to `[GET TIME]`.
    pub fn with_defaults() -> Result<Self> {
        let mut registry = Self::new();
        registry.register(Arc::new(clock_tool()))?;
        registry.bind_marker(GET_TIME_MARKER, GET_CURRENT_TIME, TIME_RESULT_PREFIX)?;
        Ok(registry)
    }

    /// Register a tool under its own name.
    ///
    /// Names must be unique and non-empty, and every tool needs a description.
    pub fn register(&mut self, tool: Arc<dyn BaseTool>) -> Result<()> {
        let name = tool.name().to_string();
        if name.trim().is_empty() {
            return Err(BifrostError::Config("tool name cannot be empty".into()));
        }
        if tool.description().trim().is_empty() {
            return Err(BifrostError::Config(format!(
                "tool '{}' needs a description",
                name
            )));
        }
        if self.tools.contains_key(&name) {
            return Err(BifrostError::Config(format!(
                "tool '{}' is already registered",
                name
            )));
        }
        log::debug!("registered tool '{}'", name);
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Map a command marker to a registered tool.
    ///
    /// `result_prefix` labels the tool's output when it is fed back to the
    /// model, e.g. `"Current Time: "`.
    pub fn bind_marker(
        &mut self,
        marker: &str,
        tool_name: &str,
        result_prefix: &str,
    ) -> Result<()> {
        if !is_valid_marker(marker) {
            return Err(BifrostError::Config(format!(
                "'{}' is not a valid command marker",
                marker
            )));
        }
        if !self.tools.contains_key(tool_name) {
            return Err(BifrostError::Config(format!(
                "cannot bind marker '{}' to unknown tool '{}'",
                marker, tool_name
            )));
        }
        if let Some(existing) = self.markers.get(marker) {
            return Err(BifrostError::Config(format!(
                "marker '{}' is already bound to '{}'",
                marker, existing.tool
            )));
        }
        self.markers.insert(
            marker.to_string(),
            MarkerBinding {
                tool: tool_name.to_string(),
                result_prefix: result_prefix.to_string(),
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn BaseTool>> {
        self.tools.get(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// `(name, description)` pairs sorted by name.
    pub fn descriptions(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .tools
            .values()
            .map(|t| (t.name().to_string(), t.description().to_string()))
            .collect();
        out.sort();
        out
    }

    /// The first bound command in `text`, if any.
    pub fn detect(&self, text: &str) -> Option<ToolRequest> {
        parse_commands(text).find_map(|command| {
            self.markers.get(&command.marker).map(|binding| ToolRequest {
                tool: binding.tool.clone(),
                result_prefix: binding.result_prefix.clone(),
                command,
            })
        })
    }

    /// Run the tool behind `request` to completion.
    ///
    /// Failures are reported as [`BifrostError::ToolInvocation`] and are not
    /// retried.
    pub async fn invoke(&self, request: &ToolRequest) -> Result<String> {
        let tool = self
            .tools
            .get(&request.tool)
            .ok_or_else(|| BifrostError::ToolInvocation {
                tool: request.tool.clone(),
                message: "tool is not registered".into(),
            })?;
        tool.arun(request.command.payload.as_deref())
            .await
            .map_err(|e| BifrostError::ToolInvocation {
                tool: request.tool.clone(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::base_tool::Tool;

    fn fixed(name: &str, out: &'static str) -> Arc<dyn BaseTool> {
        Arc::new(Tool::from_fn(name, "fixed output", move || Ok(out.to_string())))
    }

    #[test]
    fn test_defaults_bind_clock() {
        let registry = ToolRegistry::with_defaults().unwrap();
        assert_eq!(registry.len(), 1);
        let request = registry.detect("ok [GET TIME]").unwrap();
        assert_eq!(request.tool, GET_CURRENT_TIME);
        assert_eq!(
            request.result_message("Sun, 18 Oct 2026 09:05:03 GMT"),
            "Current Time: Sun, 18 Oct 2026 09:05:03 GMT"
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(fixed("a", "1")).unwrap();
        assert!(matches!(
            registry.register(fixed("a", "2")),
            Err(BifrostError::Config(_))
        ));
    }

    #[test]
    fn test_missing_description_rejected() {
        let mut registry = ToolRegistry::new();
        let tool = Arc::new(Tool::from_fn("quiet", " ", || Ok(String::new())));
        assert!(registry.register(tool).is_err());
    }

    #[test]
    fn test_bind_marker_validation() {
        let mut registry = ToolRegistry::new();
        registry.register(fixed("a", "1")).unwrap();
        assert!(registry.bind_marker("lower case", "a", "").is_err());
        assert!(registry.bind_marker("RUN A", "missing", "").is_err());
        registry.bind_marker("RUN A", "a", "A: ").unwrap();
        assert!(registry.bind_marker("RUN A", "a", "A: ").is_err());
    }

    #[test]
    fn test_detect_distinguishes_markers() {
        let mut registry = ToolRegistry::new();
        registry.register(fixed("a", "1")).unwrap();
        registry.register(fixed("b", "2")).unwrap();
        registry.bind_marker("RUN A", "a", "A: ").unwrap();
        registry.bind_marker("RUN B", "b", "B: ").unwrap();

        assert_eq!(registry.detect("[UNKNOWN] [RUN B]").unwrap().tool, "b");
        assert_eq!(registry.detect("[RUN A] [RUN B]").unwrap().tool, "a");
        assert!(registry.detect("run a").is_none());
    }

    #[tokio::test]
    async fn test_invoke_and_failure() {
        let mut registry = ToolRegistry::new();
        registry.register(fixed("a", "done")).unwrap();
        registry
            .register(Arc::new(Tool::from_fn("bad", "fails", || Err("clock offline".into()))))
            .unwrap();
        registry.bind_marker("RUN A", "a", "A: ").unwrap();
        registry.bind_marker("RUN BAD", "bad", "").unwrap();

        let ok = registry.detect("[RUN A]").unwrap();
        assert_eq!(registry.invoke(&ok).await.unwrap(), "done");

        let bad = registry.detect("[RUN BAD]").unwrap();
        match registry.invoke(&bad).await {
            Err(BifrostError::ToolInvocation { tool, message }) => {
                assert_eq!(tool, "bad");
                assert_eq!(message, "clock offline");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
