//! HTTP hosting of a tool server: the same request handler as the stdio
//! transport, mounted at `POST /mcp` for streamable-HTTP hosts.

use anyhow::Result;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use super::server::McpServer;
use super::{JsonRpcRequest, JsonRpcResponse};

pub fn router(server: Arc<McpServer>) -> Router {
    // Browser-embedded widget hosts call from arbitrary origins.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/mcp", post(handle_post).get(handle_sse))
        .layer(cors)
        .with_state(server)
}

async fn handle_post(
    State(server): State<Arc<McpServer>>,
    body: Result<Json<JsonRpcRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            error!("Failed to parse request body: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::error(Value::Null, -32700, "Parse error")),
            )
                .into_response();
        }
    };

    Json(server.handle_request(request).await).into_response()
}

/// SSE handshake stub pointing hosts at the POST endpoint.
async fn handle_sse() -> impl IntoResponse {
    (
        [("content-type", "text/event-stream")],
        "event: endpoint\ndata: /mcp\n\n",
    )
}

pub async fn run_http(server: Arc<McpServer>, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("MCP server listening on http://{}/mcp", addr);
    axum::serve(listener, router(server)).await?;
    Ok(())
}
