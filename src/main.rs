mod auth;
mod config;
mod error;
mod gateway;
mod models;
mod record;
mod server;
mod tools;
mod use_cases;

use anyhow::{Context, Result};
use config::{Config, Transport};
use gateway::{GraphGateway, OneNoteGateway};
use server::OneNoteServer;
use std::sync::Arc;

const CONFIG_PATH_VAR: &str = "ONENOTE_MCP_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Load configuration
    let config_path =
        std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)?;

    // Initialize logging (stderr; stdout may carry the protocol)
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone());
    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .init();
    log::info!("Starting OneNote MCP server...");
    log::info!("Configuration loaded ({})", config_path);

    // One gateway for the whole process, shared by every tool
    let gateway: Arc<dyn OneNoteGateway> = Arc::new(
        GraphGateway::new(&config.graph).context("Failed to configure Microsoft Graph access")?,
    );
    let server = OneNoteServer::new(gateway);

    match config.server.transport {
        Transport::Stdio => {
            log::info!("Serving MCP over stdio");
            server.serve_stdio().await?;
        }
        Transport::Http => {
            let address = config.server.bind_address();
            let listener = tokio::net::TcpListener::bind(&address)
                .await
                .with_context(|| format!("Failed to bind {}", address))?;
            log::info!("Serving MCP over streamable HTTP at http://{}{}", address, server::MCP_PATH);
            server
                .serve_http(listener, async {
                    tokio::signal::ctrl_c().await.ok();
                    log::info!("Shutdown requested");
                })
                .await?;
        }
    }

    log::info!("Server stopped");
    Ok(())
}
