//! Integration tests for server initialization.
//!
//! Run with: `cargo test --test test_server`

mod common;

use std::sync::Arc;

use rmcp::model::ServerInfo;
use rmcp::ServerHandler;
use token_wallet_mcp::{Config, DecimalsSource, TokenWalletServer};

/// Test server info.
#[test]
fn test_server_info() {
    let gateway = Arc::new(common::FakeGateway::default());
    let server = common::fake_server(gateway, DecimalsSource::default());
    let info: ServerInfo = server.get_info();

    assert_eq!(info.server_info.name, "token-wallet-mcp");
    assert!(!info.server_info.version.is_empty());
    assert!(info.capabilities.tools.is_some());
}

/// Server construction makes no network calls.
#[test]
fn test_server_from_config_is_offline() {
    let config = Config::from_vars(|key| match key {
        "ETHEREUM_RPC_URL" => Some("http://127.0.0.1:1".to_string()),
        "ETHEREUM_PRIVATE_KEY" => Some(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".to_string(),
        ),
        "TOKEN_WALLET_ADDRESS" => Some("0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string()),
        _ => None,
    })
    .unwrap();

    assert!(TokenWalletServer::new(config).is_ok());
}

/// A bad private key is reported as a wallet error.
#[test]
fn test_server_rejects_bad_key() {
    let config = Config::from_vars(|key| match key {
        "ETHEREUM_RPC_URL" => Some("http://127.0.0.1:1".to_string()),
        "ETHEREUM_PRIVATE_KEY" => Some("0x1234".to_string()),
        "TOKEN_WALLET_ADDRESS" => Some("0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string()),
        _ => None,
    })
    .unwrap();

    let err = TokenWalletServer::new(config).err().expect("server creation should fail");
    assert!(err.to_string().contains("Wallet error"));
}

/// Server built from the environment reports the same identity.
#[test]
fn test_server_info_from_env() {
    let server = skip_if_no_server!();
    assert_eq!(server.get_info().server_info.name, "token-wallet-mcp");
}
