//! Common utilities for integration tests.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use alloy::primitives::{address, Address, B256, U256};
use async_trait::async_trait;
use token_wallet_mcp::{
    services::{ContractReader, ContractWriter, PanelSettings},
    types::{BalanceQuery, WriteRequest},
    AppError, Config, DecimalsSource, TokenWalletServer,
};

pub const WALLET: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
pub const ACCOUNT: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const TOKEN: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
pub const OTHER_TOKEN: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

/// Helper to create a test server from environment variables.
pub fn create_test_server() -> Option<TokenWalletServer> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env().ok()?;
    let config = Config { log_level: "warn".to_string(), ..config };

    TokenWalletServer::new(config).ok()
}

/// Skip test if server cannot be created (missing env vars).
#[macro_export]
macro_rules! skip_if_no_server {
    () => {
        match common::create_test_server() {
            Some(server) => server,
            None => {
                eprintln!(
                    "Skipping test: ETHEREUM_RPC_URL, ETHEREUM_PRIVATE_KEY or TOKEN_WALLET_ADDRESS not set"
                );
                return;
            }
        }
    };
}

/// In-memory contract: fixed balances per token, records submissions.
#[derive(Default)]
pub struct FakeGateway {
    pub balances: HashMap<Address, U256>,
    pub decimals: HashMap<Address, u8>,
    pub submissions: Mutex<Vec<WriteRequest>>,
    /// Every dry run fails.
    pub revert: bool,
    /// Dry runs pass but mined transactions revert.
    pub revert_on_chain: bool,
}

impl FakeGateway {
    pub fn with_balance(mut self, token: &str, balance: u64) -> Self {
        self.balances.insert(token.parse().unwrap(), U256::from(balance));
        self
    }

    pub fn with_decimals(mut self, token: &str, decimals: u8) -> Self {
        self.decimals.insert(token.parse().unwrap(), decimals);
        self
    }

    pub fn submissions(&self) -> Vec<WriteRequest> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContractReader for FakeGateway {
    async fn balance_of(&self, query: &BalanceQuery) -> token_wallet_mcp::Result<U256> {
        Ok(self.balances.get(&query.token).copied().unwrap_or_default())
    }

    async fn token_decimals(&self, token: Address) -> token_wallet_mcp::Result<u8> {
        self.decimals
            .get(&token)
            .copied()
            .ok_or_else(|| AppError::Rpc("execution reverted".to_string()))
    }
}

#[async_trait]
impl ContractWriter for FakeGateway {
    async fn prepare(&self, _request: &WriteRequest) -> token_wallet_mcp::Result<()> {
        if self.revert {
            return Err(AppError::SimulationFailed("execution reverted".to_string()));
        }
        Ok(())
    }

    async fn submit(&self, request: &WriteRequest) -> token_wallet_mcp::Result<B256> {
        self.prepare(request).await?;
        self.submissions.lock().unwrap().push(*request);
        if self.revert_on_chain {
            return Err(AppError::TransactionReverted(B256::repeat_byte(0x22)));
        }
        Ok(B256::repeat_byte(0x11))
    }
}

/// Server over a fake gateway.
pub fn fake_server(gateway: Arc<FakeGateway>, decimals: DecimalsSource) -> TokenWalletServer {
    let settings = PanelSettings {
        wallet_contract: WALLET,
        decimals,
        balance_poll_interval: Duration::from_millis(50),
    };
    TokenWalletServer::with_gateways(settings, ACCOUNT, gateway.clone(), gateway)
}

pub fn parse(json: &str) -> serde_json::Value {
    serde_json::from_str(json).expect("tool output is JSON")
}
