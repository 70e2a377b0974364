//! Ethereum RPC client.

use alloy::{
    network::Ethereum,
    providers::{DynProvider, Provider, ProviderBuilder, RootProvider},
    transports::http::reqwest::Url,
};
use std::sync::Arc;

use crate::{
    error::{AppError, Result},
    ethereum::WalletManager,
};

/// Type alias for the HTTP provider.
pub type HttpProvider = RootProvider<Ethereum>;

/// Ethereum RPC client wrapper with lazy initialization.
#[derive(Clone)]
pub struct EthereumClient {
    /// Read-only provider.
    provider: Arc<HttpProvider>,
    /// Provider that fills nonce/gas/chain id and signs with the wallet.
    signer: Arc<DynProvider<Ethereum>>,
}

impl EthereumClient {
    /// Create a new Ethereum client.
    ///
    /// Note: This does NOT make any network calls. The connection is
    /// established lazily when the first operation is performed.
    pub fn new(rpc_url: &str, wallet: &WalletManager) -> Result<Self> {
        let url: Url = rpc_url
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid RPC URL: {}", rpc_url)))?;

        let provider = RootProvider::<Ethereum>::new_http(url.clone());

        let signer = ProviderBuilder::new()
            .wallet(wallet.ethereum_wallet())
            .connect_http(url.clone())
            .erased();

        tracing::info!(rpc_url = %url, account = %wallet.address(), "Ethereum client created (lazy initialization)");

        Ok(Self {
            provider: Arc::new(provider),
            signer: Arc::new(signer),
        })
    }

    /// Get the read-only provider.
    pub fn provider(&self) -> &HttpProvider {
        &self.provider
    }

    /// Get the signing provider used for state-mutating calls.
    pub fn signer(&self) -> &DynProvider<Ethereum> {
        &self.signer
    }
}
