//! Conversion of handler output (or failure) into the wire envelope.
//!
//! Every tool call produces exactly one of:
//! - a success envelope: one text block, `structuredContent`, merged `_meta`;
//! - a failure envelope: one text block, `isError: true`, nothing else.

use serde_json::Value;

use super::error::ToolError;
use super::widget::Widget;
use super::{MetaMap, ToolContent, ToolResult};

/// What a handler returns on success: the three independently meaningful
/// parts of the response, before widget metadata is merged in.
#[derive(Debug, Clone)]
pub struct ToolReply {
    pub text: String,
    pub structured: Value,
    pub meta: MetaMap,
}

impl ToolReply {
    pub fn new(text: impl Into<String>, structured: Value) -> Self {
        Self {
            text: text.into(),
            structured,
            meta: MetaMap::new(),
        }
    }

    pub fn meta_entry(mut self, key: &str, value: Value) -> Self {
        self.meta.insert(key.to_string(), value);
        self
    }
}

/// Success envelope. `_meta` is the union of the widget's invocation
/// status strings and the handler's own entries; handler entries win on
/// conflict.
pub fn success(reply: ToolReply, widget: Option<&Widget>) -> ToolResult {
    let mut meta = widget.map(Widget::invocation_meta).unwrap_or_default();
    for (key, value) in reply.meta {
        meta.insert(key, value);
    }

    ToolResult {
        content: vec![ToolContent::Text { text: reply.text }],
        structured_content: Some(reply.structured),
        is_error: None,
        meta: if meta.is_empty() { None } else { Some(meta) },
    }
}

/// Failure envelope: the error's display string, `isError: true`, no
/// structured content and no widget metadata.
pub fn failure(error: &ToolError) -> ToolResult {
    ToolResult {
        content: vec![ToolContent::Text {
            text: error.to_string(),
        }],
        structured_content: None,
        is_error: Some(true),
        meta: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::widget::{Widget, WidgetSpec};
    use serde_json::json;

    fn test_widget() -> Widget {
        Widget {
            spec: WidgetSpec {
                identifier: "vendors-list",
                title: "List Vendors",
                template_uri: "ui://widget/vendors-list.html",
                invoking: "Loading vendors...",
                invoked: "Vendors loaded",
                asset: "vendors-list",
            },
            html: "<div></div>".to_string(),
        }
    }

    #[test]
    fn test_success_merges_widget_and_handler_meta() {
        let reply = ToolReply::new("Found 2 vendors", json!({"vendors": []}))
            .meta_entry("lastSyncedAt", json!("2026-01-01T00:00:00Z"));
        let result = success(reply, Some(&test_widget()));

        let meta = result.meta.as_ref().unwrap();
        assert_eq!(meta["openai/toolInvocation/invoking"], "Loading vendors...");
        assert_eq!(meta["openai/toolInvocation/invoked"], "Vendors loaded");
        assert_eq!(meta["lastSyncedAt"], "2026-01-01T00:00:00Z");
        assert!(!result.is_error());
        assert!(result.structured_content.is_some());
    }

    #[test]
    fn test_handler_meta_wins_on_conflict() {
        let reply = ToolReply::new("ok", json!({}))
            .meta_entry("openai/toolInvocation/invoked", json!("Done differently"));
        let result = success(reply, Some(&test_widget()));
        assert_eq!(
            result.meta.unwrap()["openai/toolInvocation/invoked"],
            "Done differently"
        );
    }

    #[test]
    fn test_success_without_widget_has_handler_meta_only() {
        let reply = ToolReply::new("ok", json!({"success": true})).meta_entry("operation", json!("delete"));
        let result = success(reply, None);
        let meta = result.meta.unwrap();
        assert_eq!(meta.len(), 1);
        assert_eq!(meta["operation"], "delete");
    }

    #[test]
    fn test_failure_has_no_structured_content_or_meta() {
        let result = failure(&ToolError::UnknownTool("nope".to_string()));
        assert!(result.is_error());
        assert!(result.structured_content.is_none());
        assert!(result.meta.is_none());
        let ToolContent::Text { text } = &result.content[0];
        assert_eq!(text, "Unknown tool: nope");
    }
}
