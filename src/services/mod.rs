//! Business logic services module.

pub mod balance_watch;
pub mod gateway;
pub mod panel;

pub use balance_watch::BalanceWatch;
pub use gateway::{ContractReader, ContractWriter, RpcGateway};
pub use panel::{PanelSettings, WalletActionPanel, PANEL_TITLE};
