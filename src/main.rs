use anyhow::Result;
use argh::FromArgs;
use std::sync::Arc;
use tracing::info;

use souk_mcp::config::Config;
use souk_mcp::mcp::http::run_http;
use souk_mcp::servers::ServerKind;

#[derive(FromArgs)]
/// Widget-backed MCP tool servers
struct Args {
    /// which server to run: delivery, vendors, properties, or ideas
    #[argh(option, short = 's', default = "\"delivery\".to_string()")]
    server: String,

    /// run in HTTP mode instead of stdio
    #[argh(switch)]
    http: bool,

    /// port for HTTP mode (overrides PORT env var, default: 8000)
    #[argh(option, short = 'p')]
    port: Option<u16>,

    /// path to the widget assets directory (overrides SOUK_ASSETS_DIR)
    #[argh(option)]
    assets_dir: Option<String>,

    /// print version and exit
    #[argh(switch, short = 'v')]
    version: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Args = argh::from_env();

    if args.version {
        println!("souk-mcp {}", env!("SOUK_MCP_VERSION"));
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let mut config = Config::from_env();
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(assets_dir) = args.assets_dir {
        config.assets_dir = assets_dir.into();
    }

    let kind: ServerKind = args.server.parse()?;
    let server = kind.build(&config)?;
    info!(
        "Starting MCP server '{}' with {} tools",
        server.name(),
        server.registry().len()
    );

    if args.http {
        run_http(Arc::new(server), config.port).await?;
    } else {
        server.run_stdio().await?;
    }

    Ok(())
}
