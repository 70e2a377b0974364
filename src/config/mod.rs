//! Configuration management module.
//!
//! Handles loading configuration from environment variables. The configuration
//! is read once at startup and shared immutably afterwards.

use std::{env, str::FromStr, time::Duration};

use alloy::primitives::Address;

use crate::{
    error::AppError,
    ethereum::constants::{DEFAULT_AMOUNT_DECIMALS, DEFAULT_BALANCE_POLL_INTERVAL},
};

/// Where the decimal scale for amounts comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalsSource {
    /// Every token is scaled by the same number of decimals.
    Fixed(u8),
    /// The token's own `decimals()` is queried; `fallback` is used if the
    /// lookup fails.
    OnChain { fallback: u8 },
}

impl DecimalsSource {
    /// The scale used when no on-chain value is known.
    pub fn fallback(&self) -> u8 {
        match *self {
            DecimalsSource::Fixed(decimals) => decimals,
            DecimalsSource::OnChain { fallback } => fallback,
        }
    }
}

impl Default for DecimalsSource {
    fn default() -> Self {
        DecimalsSource::Fixed(DEFAULT_AMOUNT_DECIMALS)
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ethereum JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Private key for the wallet the connect control uses (hex string with 0x prefix).
    pub private_key: String,
    /// Address of the token-wallet contract.
    pub wallet_contract: Address,
    /// Decimal scale policy for amounts.
    pub decimals: DecimalsSource,
    /// How often the balance watch re-reads the contract.
    pub balance_poll_interval: Duration,
    /// Logging level (default: info).
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `ETHEREUM_RPC_URL`: Ethereum JSON-RPC endpoint
    /// - `ETHEREUM_PRIVATE_KEY`: Private key for wallet (hex)
    /// - `TOKEN_WALLET_ADDRESS`: Token-wallet contract address
    ///
    /// Optional environment variables:
    /// - `AMOUNT_DECIMALS`: Fixed decimal scale (default: 18)
    /// - `TOKEN_DECIMALS_SOURCE`: `fixed` or `onchain` (default: fixed)
    /// - `BALANCE_POLL_INTERVAL_MS`: Balance watch period (default: 4000)
    /// - `LOG_LEVEL`: Logging level (default: info)
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{key} environment variable not set")))
        };

        let rpc_url = required("ETHEREUM_RPC_URL")?;
        let private_key = required("ETHEREUM_PRIVATE_KEY")?;

        let wallet_contract = required("TOKEN_WALLET_ADDRESS")?;
        let wallet_contract = Address::from_str(wallet_contract.trim()).map_err(|e| {
            AppError::Config(format!("Invalid TOKEN_WALLET_ADDRESS '{wallet_contract}': {e}"))
        })?;

        let amount_decimals = match lookup("AMOUNT_DECIMALS") {
            Some(raw) => raw
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|d| *d <= 77)
                .ok_or_else(|| AppError::Config(format!("Invalid AMOUNT_DECIMALS: {raw}")))?,
            None => DEFAULT_AMOUNT_DECIMALS,
        };

        let decimals = match lookup("TOKEN_DECIMALS_SOURCE").as_deref().map(str::trim) {
            None | Some("fixed") => DecimalsSource::Fixed(amount_decimals),
            Some("onchain") => DecimalsSource::OnChain { fallback: amount_decimals },
            Some(other) => {
                return Err(AppError::Config(format!(
                    "Invalid TOKEN_DECIMALS_SOURCE '{other}' (expected 'fixed' or 'onchain')"
                )))
            }
        };

        let balance_poll_interval = match lookup("BALANCE_POLL_INTERVAL_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .ok_or_else(|| {
                    AppError::Config(format!("Invalid BALANCE_POLL_INTERVAL_MS: {raw}"))
                })?,
            None => DEFAULT_BALANCE_POLL_INTERVAL,
        };

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            rpc_url,
            private_key,
            wallet_contract,
            decimals,
            balance_poll_interval,
            log_level,
        })
    }
}
