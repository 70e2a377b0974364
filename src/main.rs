//! Token Wallet MCP Server
//!
//! A Model Context Protocol server for depositing into and withdrawing from a
//! token-wallet contract.

use rmcp::ServiceExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use token_wallet_mcp::{Config, TokenWalletServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging (stdout carries the MCP transport)
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::info!(contract = %config.wallet_contract, "Starting Token Wallet MCP Server");

    let server = TokenWalletServer::new(config)?;

    // Run with stdio transport
    let transport = rmcp::transport::stdio();
    let running = server.serve(transport).await?;

    running.waiting().await?;

    tracing::info!("Token Wallet MCP Server stopped");

    Ok(())
}
