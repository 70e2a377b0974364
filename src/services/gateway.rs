//! Read and write gateways to the token-wallet contract.
//!
//! The panel only talks to these traits; `RpcGateway` is the JSON-RPC
//! implementation, tests substitute in-memory fakes.

use std::sync::Arc;

use alloy::{
    primitives::{Address, B256, U256},
    providers::Provider,
    rpc::types::TransactionRequest,
    sol_types::SolCall,
};
use async_trait::async_trait;

use crate::{
    error::{AppError, Result},
    ethereum::{
        contracts::{ITokenWallet, IERC20},
        EthereumClient,
    },
    types::{BalanceQuery, WriteRequest},
};

/// Read-only calls.
#[async_trait]
pub trait ContractReader: Send + Sync {
    /// Execute `balanceOf(user, token)` and return the raw balance.
    async fn balance_of(&self, query: &BalanceQuery) -> Result<U256>;

    /// Read the token's `decimals()`.
    async fn token_decimals(&self, token: Address) -> Result<u8>;
}

/// State-mutating calls.
#[async_trait]
pub trait ContractWriter: Send + Sync {
    /// Dry-run the call from the sending account without signing it.
    ///
    /// An error means the call would revert as things stand.
    async fn prepare(&self, request: &WriteRequest) -> Result<()>;

    /// Simulate, sign, broadcast and wait for the receipt.
    ///
    /// Returns the transaction hash of a successfully mined call.
    async fn submit(&self, request: &WriteRequest) -> Result<B256>;
}

/// Gateway backed by an Ethereum JSON-RPC endpoint.
#[derive(Clone)]
pub struct RpcGateway {
    client: Arc<EthereumClient>,
    account: Address,
}

impl RpcGateway {
    /// Create a gateway that sends transactions from `account`.
    pub fn new(client: Arc<EthereumClient>, account: Address) -> Self {
        Self { client, account }
    }

    fn transaction(&self, request: &WriteRequest) -> TransactionRequest {
        TransactionRequest::default()
            .from(self.account)
            .to(request.contract)
            .input(request.calldata().into())
    }
}

#[async_trait]
impl ContractReader for RpcGateway {
    async fn balance_of(&self, query: &BalanceQuery) -> Result<U256> {
        tracing::debug!(
            contract = %query.contract,
            user = %query.user,
            token = %query.token,
            "Querying wallet balance"
        );

        let tx = TransactionRequest::default().to(query.contract).input(query.calldata().into());
        let output = self.client.provider().call(tx).await?;

        ITokenWallet::balanceOfCall::abi_decode_returns(&output)
            .map_err(|e| AppError::Parse(format!("Invalid balanceOf return data: {e}")))
    }

    async fn token_decimals(&self, token: Address) -> Result<u8> {
        let contract = IERC20::new(token, self.client.provider().clone());
        let decimals = contract.decimals().call().await?;

        tracing::debug!(token = %token, decimals, "Token decimals resolved");

        Ok(decimals)
    }
}

#[async_trait]
impl ContractWriter for RpcGateway {
    async fn prepare(&self, request: &WriteRequest) -> Result<()> {
        self.client
            .signer()
            .call(self.transaction(request))
            .await
            .map_err(|e| AppError::SimulationFailed(e.to_string()))?;

        tracing::debug!(
            action = %request.action,
            token = %request.token,
            amount = %request.amount,
            "Wallet call prepared"
        );

        Ok(())
    }

    async fn submit(&self, request: &WriteRequest) -> Result<B256> {
        // Chain state may have moved since the last preparation.
        self.prepare(request).await?;

        let pending = self.client.signer().send_transaction(self.transaction(request)).await?;
        let tx_hash = *pending.tx_hash();

        tracing::info!(
            action = %request.action,
            token = %request.token,
            amount = %request.amount,
            tx_hash = %tx_hash,
            "Transaction broadcast"
        );

        let receipt = pending.get_receipt().await?;
        if !receipt.status() {
            return Err(AppError::TransactionReverted(tx_hash));
        }

        tracing::info!(
            tx_hash = %tx_hash,
            block = ?receipt.block_number,
            gas_used = receipt.gas_used,
            "Transaction confirmed"
        );

        Ok(tx_hash)
    }
}
