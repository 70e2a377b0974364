//! Token Wallet MCP Server Library
//!
//! A Model Context Protocol server fronting a simple token-wallet contract.
//! The connected account can deposit ERC20 tokens into the contract, withdraw
//! them again, and watch its balance there.
//!
//! # Features
//!
//! - **Request derivation**: `deposit` / `withdraw` / `balanceOf` calls are
//!   derived from the typed token address and amount, and gated off while the
//!   inputs are incomplete or invalid
//! - **Live balance**: the balance for the current token is polled in the
//!   background and the watch follows every input change
//! - **Guarded submission**: each action is submitted once per input change
//!   and never while a previous submission is still in flight
//!
//! # Example
//!
//! ```rust,ignore
//! use token_wallet_mcp::{Config, TokenWalletServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let server = TokenWalletServer::new(config)?;
//!     // Run server...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod ethereum;
pub mod mcp;
pub mod services;
pub mod types;

pub use config::{Config, DecimalsSource};
pub use error::{AppError, Result};
pub use ethereum::constants::*;
pub use mcp::TokenWalletServer;
