//! Tool registry and dispatch.
//!
//! One generic registry serves every tool server: per-tool schemas,
//! handlers and widget bindings are plugged in as values at startup and
//! immutable afterwards. Dispatch is infallible; every failure mode is
//! folded into a failure envelope before it can reach the transport.

use anyhow::{Result, bail};
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, error, warn};

use super::error::{ToolError, ValidationError};
use super::envelope::{self, ToolReply};
use super::schema::{InputSchema, ValidatedArgs};
use super::widget::Widget;
use super::{Tool, ToolAnnotations, ToolResult};

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<ToolReply, ToolError>> + Send>>;
type Handler = Box<dyn Fn(ValidatedArgs) -> HandlerFuture + Send + Sync>;

/// Everything the host needs to know about one tool, plus its widget
/// binding. Immutable after registration.
pub struct ToolDefinition {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub schema: InputSchema,
    pub widget: Option<Widget>,
    pub annotations: Option<ToolAnnotations>,
}

struct ToolEntry {
    definition: ToolDefinition,
    handler: Handler,
}

#[derive(Default)]
pub struct ToolRegistry {
    entries: Vec<ToolEntry>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a tool. Names must be unique within a server instance.
    pub fn register<F, Fut>(&mut self, definition: ToolDefinition, handler: F) -> Result<()>
    where
        F: Fn(ValidatedArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolReply, ToolError>> + Send + 'static,
    {
        if self.entries.iter().any(|e| e.definition.name == definition.name) {
            bail!("tool already registered: {}", definition.name);
        }
        debug!("Registering tool: {}", definition.name);
        self.entries.push(ToolEntry {
            definition,
            handler: Box::new(move |args| -> HandlerFuture { Box::pin(handler(args)) }),
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wire-format tool definitions for `tools/list`, in registration order.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.entries
            .iter()
            .map(|entry| Tool {
                name: entry.definition.name.to_string(),
                title: Some(entry.definition.title.to_string()),
                description: entry.definition.description.to_string(),
                input_schema: entry.definition.schema.to_json(),
                annotations: entry.definition.annotations,
                meta: entry.definition.widget.as_ref().map(Widget::tool_meta),
            })
            .collect()
    }

    /// Route one call: look up the tool, validate arguments, run the
    /// handler, envelope the outcome. Never returns an error and never
    /// panics on untrusted input.
    pub async fn dispatch(&self, name: &str, arguments: Value) -> ToolResult {
        let Some(entry) = self.entries.iter().find(|e| e.definition.name == name) else {
            warn!("Tool not found: {}", name);
            return envelope::failure(&ToolError::UnknownTool(name.to_string()));
        };

        let args = match arguments {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return envelope::failure(&ToolError::Validation(ValidationError::InvalidType {
                    field: "arguments".to_string(),
                    expected: "an object",
                    value: other,
                }));
            }
        };

        let validated = match entry.definition.schema.validate(&args) {
            Ok(validated) => validated,
            Err(err) => {
                warn!("Validation failed for {}: {}", name, err);
                return envelope::failure(&err.into());
            }
        };

        match (entry.handler)(validated).await {
            Ok(reply) => envelope::success(reply, entry.definition.widget.as_ref()),
            Err(err) => {
                error!("Tool {} failed: {}", name, err);
                envelope::failure(&err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::ToolContent;
    use crate::mcp::schema::FieldSpec;
    use serde_json::json;

    fn echo_definition() -> ToolDefinition {
        ToolDefinition {
            name: "echo",
            title: "Echo",
            description: "Echoes the message back",
            schema: InputSchema::new()
                .field("message", FieldSpec::string("Message to echo").required()),
            widget: None,
            annotations: Some(ToolAnnotations::READ_ONLY),
        }
    }

    fn echo_registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry
            .register(echo_definition(), |args| async move {
                let message = args
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Ok(ToolReply::new(message.clone(), json!({ "message": message })))
            })
            .unwrap();
        registry
    }

    fn text_of(result: &ToolResult) -> &str {
        let ToolContent::Text { text } = &result.content[0];
        text
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool_returns_failure_envelope() {
        let registry = echo_registry();
        let result = registry.dispatch("missing", json!({})).await;
        assert!(result.is_error());
        assert_eq!(text_of(&result), "Unknown tool: missing");
        assert!(result.structured_content.is_none());
    }

    #[tokio::test]
    async fn test_dispatch_validation_failure_short_circuits() {
        let registry = echo_registry();
        let result = registry.dispatch("echo", json!({})).await;
        assert!(result.is_error());
        assert!(text_of(&result).starts_with("Input validation error:"));
        assert!(text_of(&result).contains("message"));
    }

    #[tokio::test]
    async fn test_dispatch_rejects_non_object_arguments() {
        let registry = echo_registry();
        let result = registry.dispatch("echo", json!([1, 2])).await;
        assert!(result.is_error());
    }

    #[tokio::test]
    async fn test_dispatch_success_carries_structured_content() {
        let registry = echo_registry();
        let result = registry
            .dispatch("echo", json!({"message": "hello"}))
            .await;
        assert!(!result.is_error());
        assert_eq!(text_of(&result), "hello");
        assert_eq!(result.structured_content, Some(json!({"message": "hello"})));
    }

    #[tokio::test]
    async fn test_handler_error_becomes_failure_envelope() {
        let mut registry = ToolRegistry::new();
        registry
            .register(
                ToolDefinition {
                    name: "flaky",
                    title: "Flaky",
                    description: "Always fails",
                    schema: InputSchema::new(),
                    widget: None,
                    annotations: None,
                },
                |_args| async move {
                    Err::<ToolReply, _>(ToolError::Upstream("rate limited".to_string()))
                },
            )
            .unwrap();

        let result = registry.dispatch("flaky", json!({})).await;
        assert!(result.is_error());
        assert!(text_of(&result).contains("rate limited"));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = echo_registry();
        let err = registry
            .register(echo_definition(), |_args| async move {
                Ok(ToolReply::new("dup", json!({})))
            })
            .unwrap_err();
        assert!(err.to_string().contains("echo"));
    }

    #[test]
    fn test_list_tools_is_idempotent() {
        let registry = echo_registry();
        let first = serde_json::to_value(registry.list_tools()).unwrap();
        let second = serde_json::to_value(registry.list_tools()).unwrap();
        assert_eq!(first, second);
    }
}
