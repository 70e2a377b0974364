//! Smart contract bindings.

pub mod erc20;
pub mod token_wallet;

pub use erc20::IERC20;
pub use token_wallet::ITokenWallet;
