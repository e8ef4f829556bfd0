// Standalone MCP server binary

use anyhow::Result;
use std::sync::Arc;
use toolhub_core::{Dispatcher, ResourceStore};
use toolhub_mcp::McpServer;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Toolhub MCP Server starting...");

    let dispatcher = Arc::new(Dispatcher::with_builtin_tools());
    let resources = Arc::new(ResourceStore::with_sample_resources());

    tracing::info!(
        "Registered {} tools and {} resources",
        dispatcher.list_tools().len(),
        resources.count()
    );

    let server = McpServer::new(dispatcher, resources);
    server.start().await?;

    Ok(())
}
