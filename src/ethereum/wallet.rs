//! Wallet management.
//!
//! Backs the connect control: the configured key is the account the session
//! exposes once connected.

use alloy::{network::EthereumWallet, primitives::Address, signers::local::PrivateKeySigner};

use crate::error::Result;

/// Wallet manager for transaction signing.
#[derive(Clone)]
pub struct WalletManager {
    signer: PrivateKeySigner,
    address: Address,
}

impl WalletManager {
    /// Create a wallet manager from a private key string (with or without 0x).
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let key = private_key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);

        let signer: PrivateKeySigner = key.parse()?;

        let address = signer.address();

        tracing::info!(address = %address, "Wallet loaded");

        Ok(Self { signer, address })
    }

    /// The account address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Network wallet used by the signing provider.
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

impl std::fmt::Debug for WalletManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletManager").field("address", &self.address).finish()
    }
}
