use anyhow::Result;
use serde_json::json;
use tracing::{debug, error, info, warn};

use super::registry::ToolRegistry;
use super::transport::StdioTransport;
use super::widget::WidgetCatalog;
use super::{
    CallToolParams, InitializeResult, JsonRpcRequest, JsonRpcResponse, ListResourceTemplatesResult,
    ListResourcesResult, ListToolsResult, PROTOCOL_VERSION, ReadResourceParams,
    ResourcesCapability, ServerCapabilities, ServerInfo, ToolsCapability,
};

/// One tool server: an immutable registry plus its widget catalog, routed
/// behind the JSON-RPC methods the host speaks. The server holds no
/// per-request state; concurrent calls share it read-only.
pub struct McpServer {
    name: String,
    registry: ToolRegistry,
    widgets: WidgetCatalog,
}

impl McpServer {
    pub fn new(name: impl Into<String>, registry: ToolRegistry, widgets: WidgetCatalog) -> Self {
        Self {
            name: name.into(),
            registry,
            widgets,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn widgets(&self) -> &WidgetCatalog {
        &self.widgets
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!("Handling request: {}", request.method);
        let JsonRpcRequest {
            id, method, params, ..
        } = request;

        match method.as_str() {
            "initialize" => JsonRpcResponse::success(
                id,
                serde_json::to_value(self.initialize_result()).unwrap(),
            ),
            "notifications/initialized" | "initialized" => {
                JsonRpcResponse::success(id, json!({}))
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => {
                let result = ListToolsResult {
                    tools: self.registry.list_tools(),
                };
                JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
            }
            "tools/call" => {
                let params: CallToolParams = match serde_json::from_value(params) {
                    Ok(params) => params,
                    Err(e) => {
                        error!("Failed to parse tool call params: {}", e);
                        return JsonRpcResponse::error(id, -32602, "Invalid params");
                    }
                };
                let result = self.registry.dispatch(&params.name, params.arguments).await;
                JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
            }
            "resources/list" => {
                let result = ListResourcesResult {
                    resources: self.widgets.list_resources(),
                };
                JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
            }
            "resources/templates/list" => {
                let result = ListResourceTemplatesResult {
                    resource_templates: self.widgets.list_resource_templates(),
                };
                JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
            }
            "resources/read" => {
                let params: ReadResourceParams = match serde_json::from_value(params) {
                    Ok(params) => params,
                    Err(e) => {
                        error!("Failed to parse resource read params: {}", e);
                        return JsonRpcResponse::error(id, -32602, "Invalid params");
                    }
                };
                let result = self.widgets.read(&params.uri);
                JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
            }
            _ => {
                warn!("Unknown method: {}", method);
                JsonRpcResponse::error(id, -32601, "Method not found")
            }
        }
    }

    fn initialize_result(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                resources: Some(ResourcesCapability {
                    list_changed: Some(false),
                    subscribe: Some(false),
                }),
            },
            server_info: ServerInfo {
                name: self.name.clone(),
                version: env!("SOUK_MCP_VERSION").to_string(),
            },
        }
    }

    /// Serve line-delimited JSON-RPC over stdin/stdout until EOF.
    pub async fn run_stdio(&self) -> Result<()> {
        let mut transport = StdioTransport::new();
        info!("MCP server '{}' started, waiting for requests...", self.name);

        loop {
            match transport.read_request().await {
                Ok(Some(request)) => {
                    let response = self.handle_request(request).await;
                    if let Err(e) = transport.write_response(&response).await {
                        warn!("Failed to write response: {}", e);
                    }
                }
                Ok(None) => {
                    info!("Connection closed");
                    break;
                }
                Err(e) => {
                    warn!("Error reading request: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }
}
