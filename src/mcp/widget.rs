//! Widget catalog: static HTML fragments served as MCP resources.
//!
//! Widget HTML is loaded once at startup and cached for the process
//! lifetime. A missing asset aborts startup; resource reads never fail
//! per-request.

use anyhow::{Context, Result, bail};
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{
    MIME_TYPE, MetaMap, ReadResourceResult, Resource, ResourceTemplate, TextResourceContents,
};

/// Declaration of a widget before its HTML is loaded.
#[derive(Debug, Clone)]
pub struct WidgetSpec {
    pub identifier: &'static str,
    pub title: &'static str,
    pub template_uri: &'static str,
    /// Status line shown while the bound tool is running.
    pub invoking: &'static str,
    /// Status line shown once the bound tool has finished.
    pub invoked: &'static str,
    /// Asset file stem under the assets directory.
    pub asset: &'static str,
}

#[derive(Debug, Clone)]
pub struct Widget {
    pub spec: WidgetSpec,
    pub html: String,
}

impl Widget {
    /// Metadata advertised on tool definitions and resource listings.
    pub fn tool_meta(&self) -> MetaMap {
        let mut meta = self.invocation_meta();
        meta.insert(
            "openai/outputTemplate".to_string(),
            json!(self.spec.template_uri),
        );
        meta.insert("openai/widgetAccessible".to_string(), json!(true));
        meta
    }

    /// Metadata merged into every tool-call response bound to this widget.
    pub fn invocation_meta(&self) -> MetaMap {
        let mut meta = MetaMap::new();
        meta.insert(
            "openai/toolInvocation/invoking".to_string(),
            json!(self.spec.invoking),
        );
        meta.insert(
            "openai/toolInvocation/invoked".to_string(),
            json!(self.spec.invoked),
        );
        meta
    }
}

/// Immutable registry of widgets, indexed by identifier and template URI.
#[derive(Debug)]
pub struct WidgetCatalog {
    widgets: Vec<Widget>,
    by_id: HashMap<String, usize>,
    by_uri: HashMap<String, usize>,
}

impl WidgetCatalog {
    /// Load every declared widget's HTML from `assets_dir`. Fails fast on
    /// a missing asset or a duplicate identifier/URI.
    pub fn load(assets_dir: &Path, specs: &[WidgetSpec]) -> Result<Self> {
        let mut widgets = Vec::with_capacity(specs.len());
        let mut by_id = HashMap::new();
        let mut by_uri = HashMap::new();

        for spec in specs {
            let html = load_widget_html(assets_dir, spec.asset)?;
            info!("Loaded widget '{}' ({} bytes)", spec.identifier, html.len());

            let index = widgets.len();
            if by_id.insert(spec.identifier.to_string(), index).is_some() {
                bail!("duplicate widget identifier: {}", spec.identifier);
            }
            if by_uri.insert(spec.template_uri.to_string(), index).is_some() {
                bail!("duplicate widget template URI: {}", spec.template_uri);
            }
            widgets.push(Widget {
                spec: spec.clone(),
                html,
            });
        }

        Ok(Self {
            widgets,
            by_id,
            by_uri,
        })
    }

    pub fn get(&self, identifier: &str) -> Option<&Widget> {
        self.by_id.get(identifier).map(|&i| &self.widgets[i])
    }

    pub fn get_by_uri(&self, uri: &str) -> Option<&Widget> {
        self.by_uri.get(uri).map(|&i| &self.widgets[i])
    }

    pub fn list_resources(&self) -> Vec<Resource> {
        self.widgets
            .iter()
            .map(|widget| Resource {
                name: widget.spec.title.to_string(),
                title: Some(widget.spec.title.to_string()),
                uri: widget.spec.template_uri.to_string(),
                description: Some(format!("{} widget markup", widget.spec.title)),
                mime_type: MIME_TYPE.to_string(),
                meta: Some(widget.tool_meta()),
            })
            .collect()
    }

    pub fn list_resource_templates(&self) -> Vec<ResourceTemplate> {
        self.widgets
            .iter()
            .map(|widget| ResourceTemplate {
                name: widget.spec.title.to_string(),
                title: Some(widget.spec.title.to_string()),
                uri_template: widget.spec.template_uri.to_string(),
                description: Some(format!("{} widget markup", widget.spec.title)),
                mime_type: MIME_TYPE.to_string(),
                meta: Some(widget.tool_meta()),
            })
            .collect()
    }

    /// Exact-match read of a widget's HTML. An unknown URI yields an empty
    /// content list plus an error note in `_meta`, never an error.
    pub fn read(&self, uri: &str) -> ReadResourceResult {
        let Some(widget) = self.get_by_uri(uri) else {
            let mut meta = MetaMap::new();
            meta.insert("error".to_string(), json!(format!("Unknown resource: {uri}")));
            return ReadResourceResult {
                contents: Vec::new(),
                meta: Some(meta),
            };
        };

        ReadResourceResult {
            contents: vec![TextResourceContents {
                uri: widget.spec.template_uri.to_string(),
                mime_type: MIME_TYPE.to_string(),
                text: widget.html.clone(),
                meta: Some(widget.tool_meta()),
            }],
            meta: None,
        }
    }
}

/// Read `<asset>.html`, falling back to the newest versioned build
/// (`<asset>-*.html`, lexicographically last).
fn load_widget_html(assets_dir: &Path, asset: &str) -> Result<String> {
    let path = assets_dir.join(format!("{asset}.html"));
    if path.exists() {
        return fs::read_to_string(&path)
            .with_context(|| format!("failed to read widget asset {}", path.display()));
    }

    let prefix = format!("{asset}-");
    let mut candidates: Vec<PathBuf> = fs::read_dir(assets_dir)
        .with_context(|| format!("failed to read assets directory {}", assets_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension().and_then(|s| s.to_str()) == Some("html")
                && p.file_name()
                    .and_then(|s| s.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
        })
        .collect();
    candidates.sort();

    if let Some(latest) = candidates.last() {
        return fs::read_to_string(latest)
            .with_context(|| format!("failed to read widget asset {}", latest.display()));
    }

    bail!(
        "widget HTML for \"{asset}\" not found in {}",
        assets_dir.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const VENDORS_WIDGET: WidgetSpec = WidgetSpec {
        identifier: "vendors-list",
        title: "List Vendors",
        template_uri: "ui://widget/vendors-list.html",
        invoking: "Loading vendors...",
        invoked: "Vendors loaded",
        asset: "vendors-list",
    };

    #[test]
    fn test_load_reads_exact_asset() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("vendors-list.html"), "<div>v</div>").unwrap();

        let catalog = WidgetCatalog::load(dir.path(), &[VENDORS_WIDGET]).unwrap();
        assert_eq!(catalog.get("vendors-list").unwrap().html, "<div>v</div>");
    }

    #[test]
    fn test_load_falls_back_to_latest_versioned_asset() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("vendors-list-001.html"), "old").unwrap();
        fs::write(dir.path().join("vendors-list-002.html"), "new").unwrap();

        let catalog = WidgetCatalog::load(dir.path(), &[VENDORS_WIDGET]).unwrap();
        assert_eq!(catalog.get("vendors-list").unwrap().html, "new");
    }

    #[test]
    fn test_load_fails_fast_on_missing_asset() {
        let dir = tempfile::tempdir().unwrap();
        let err = WidgetCatalog::load(dir.path(), &[VENDORS_WIDGET]).unwrap_err();
        assert!(err.to_string().contains("vendors-list"));
    }

    #[test]
    fn test_read_known_uri_returns_cached_html() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("vendors-list.html"), "<div>v</div>").unwrap();
        let catalog = WidgetCatalog::load(dir.path(), &[VENDORS_WIDGET]).unwrap();

        let result = catalog.read("ui://widget/vendors-list.html");
        assert_eq!(result.contents.len(), 1);
        assert_eq!(result.contents[0].text, "<div>v</div>");
        assert_eq!(result.contents[0].mime_type, MIME_TYPE);
    }

    #[test]
    fn test_read_unknown_uri_returns_empty_contents_with_error_note() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("vendors-list.html"), "x").unwrap();
        let catalog = WidgetCatalog::load(dir.path(), &[VENDORS_WIDGET]).unwrap();

        let result = catalog.read("ui://widget/does-not-exist.html");
        assert!(result.contents.is_empty());
        let note = result.meta.unwrap();
        assert_eq!(
            note["error"],
            "Unknown resource: ui://widget/does-not-exist.html"
        );
    }
}
