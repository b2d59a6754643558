//! Image generation MCP server.
//!
//! Serves `generate_and_upload_image` over stdio (default) or streamable HTTP.

use anyhow::Result;
use clap::Parser;
use imagegen_mcp_common::config::{FAL_KEY_VAR, IMAGEKIT_PRIVATE_KEY_VAR, IMAGEKIT_PUBLIC_KEY_VAR};
use imagegen_mcp_common::tracing::init_tracing;
use imagegen_mcp_common::{Config, McpServerBuilder, TransportArgs};
use imagegen_mcp_server::ImageServer;

/// Command-line arguments for the image server.
#[derive(Parser, Debug)]
#[command(name = "imagegen-mcp-server")]
#[command(about = "MCP server that generates images with fal.ai and uploads them to ImageKit")]
struct Args {
    /// Transport configuration
    #[command(flatten)]
    transport: TransportArgs,
}

fn warn_missing_credentials(config: &Config) {
    let missing = config.missing_credentials();
    if missing.contains(&FAL_KEY_VAR) {
        tracing::warn!("{} environment variable is not set", FAL_KEY_VAR);
    }
    if missing.contains(&IMAGEKIT_PUBLIC_KEY_VAR) || missing.contains(&IMAGEKIT_PRIVATE_KEY_VAR) {
        tracing::warn!("ImageKit credentials are not set");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    tracing::info!("imagegen-mcp-server starting...");

    let args = Args::parse();

    let config = Config::from_env()?;
    tracing::info!(
        fal_api_url = %config.fal_api_url,
        timeout_secs = config.http_timeout_secs,
        "Configuration loaded"
    );
    warn_missing_credentials(&config);

    let server = ImageServer::new(&config)?;

    let transport = args.transport.into_transport();
    McpServerBuilder::new(server)
        .with_transport(transport)
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
