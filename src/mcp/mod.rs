//! MCP server module.
//!
//! Contains the MCP server implementation with tool handlers.

pub mod server;

pub use server::TokenWalletServer;
pub use server::{SetAmountInput, SetTokenAddressInput};
